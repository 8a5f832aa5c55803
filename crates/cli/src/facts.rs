use brief_config::RareFacts;
use brief_protocol::paths;
use std::path::Path;
use walkdir::WalkDir;

/// Verify configured rare facts; returns the labels of the ones that could
/// not be confirmed (`env:FOO`, `flag:X`, `path:Y`).
///
/// Environment facts check variable presence; flag and path facts check
/// that the literal token occurs in at least one readable file. The tool's
/// own outputs and the configuration file are excluded from the token scan
/// so a fact can never confirm itself.
pub fn verify(root: &Path, facts: &RareFacts) -> Vec<String> {
    let mut missing = Vec::new();

    for key in &facts.env {
        if std::env::var_os(key).is_none() {
            missing.push(format!("env:{key}"));
        }
    }

    for key in &facts.flags {
        if !tree_contains_token(root, key) {
            missing.push(format!("flag:{key}"));
        }
    }
    for key in &facts.paths {
        if !tree_contains_token(root, key) {
            missing.push(format!("path:{key}"));
        }
    }

    missing
}

fn tree_contains_token(root: &Path, token: &str) -> bool {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry.file_name().to_string_lossy().as_ref()));

    for entry in walker {
        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = paths::relative_to_root(root, entry.path()) else {
            continue;
        };
        if paths::is_self_output(&rel) {
            continue;
        }
        let Ok(bytes) = std::fs::read(entry.path()) else {
            continue;
        };
        if String::from_utf8_lossy(&bytes).contains(token) {
            return true;
        }
    }
    false
}

fn is_skipped_dir(name: &str) -> bool {
    matches!(
        name,
        ".git" | brief_protocol::OUTPUT_DIR | brief_protocol::HIDDEN_OUTPUT_DIR
    )
}
