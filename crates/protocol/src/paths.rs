use std::path::Path;

/// Repo-relative, forward-slash form of `path` under `root`.
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(normalize_slashes(&relative.to_string_lossy()))
}

/// Forward-slash normalization for pattern matching and rendering.
pub fn normalize_slashes(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// True when the relative path belongs to the tool's own outputs or
/// control files and must never be packed.
pub fn is_self_output(rel_path: &str) -> bool {
    let prefixes = [
        concat_dir(crate::OUTPUT_DIR),
        concat_dir(crate::HIDDEN_OUTPUT_DIR),
    ];
    if prefixes.iter().any(|p| rel_path.starts_with(p.as_str())) {
        return true;
    }
    rel_path == crate::PLAN_FILE || rel_path == crate::CONFIG_FILE
}

fn concat_dir(dir: &str) -> String {
    format!("{dir}/")
}
