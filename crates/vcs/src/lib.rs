//! # Brief Vcs
//!
//! Best-effort git queries. Every lookup degrades to a sentinel on
//! failure (missing binary, not a repository, unknown path) because the
//! pack must still be produced without version control.

use std::path::Path;
use std::process::Command;

pub const UNKNOWN: &str = "unknown";

/// Current branch and commit, `"unknown"` when either lookup fails.
pub fn branch_and_commit(root: &Path) -> (String, String) {
    let branch = git_stdout(root, &["rev-parse", "--abbrev-ref", "HEAD"])
        .unwrap_or_else(|| UNKNOWN.to_string());
    let commit =
        git_stdout(root, &["rev-parse", "HEAD"]).unwrap_or_else(|| UNKNOWN.to_string());
    (branch, commit)
}

/// Unix time of the last commit touching `rel_path`; 0 when there is no
/// commit info.
pub fn last_commit_epoch(root: &Path, rel_path: &str) -> i64 {
    git_stdout(root, &["log", "-1", "--format=%ct", "--", rel_path])
        .and_then(|out| out.parse::<i64>().ok())
        .unwrap_or(0)
}

/// Paths reported modified by `git diff --name-only` or `git ls-files -m`,
/// deduplicated, first-seen order.
pub fn modified_paths(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    for args in [
        &["diff", "--name-only"][..],
        &["ls-files", "-m"][..],
    ] {
        let Some(stdout) = git_stdout_raw(root, args) else {
            continue;
        };
        for line in stdout.lines() {
            let line = line.trim();
            if !line.is_empty() && !out.iter().any(|seen| seen == line) {
                out.push(line.to_string());
            }
        }
    }
    out
}

fn git_stdout(root: &Path, args: &[&str]) -> Option<String> {
    let out = git_stdout_raw(root, args)?;
    let trimmed = out.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn git_stdout_raw(root: &Path, args: &[&str]) -> Option<String> {
    let output = match Command::new("git").args(args).current_dir(root).output() {
        Ok(output) => output,
        Err(e) => {
            log::debug!("git {args:?} failed to spawn: {e}");
            return None;
        }
    };
    if !output.status.success() {
        log::debug!("git {args:?} exited with {}", output.status);
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    // Plain directories are not repositories; every query must fall back
    // instead of erroring.

    #[test]
    fn branch_and_commit_fall_back_to_unknown() {
        let temp = tempdir().unwrap();
        let (branch, commit) = branch_and_commit(temp.path());
        assert_eq!(branch, UNKNOWN);
        assert_eq!(commit, UNKNOWN);
    }

    #[test]
    fn last_commit_epoch_falls_back_to_zero() {
        let temp = tempdir().unwrap();
        assert_eq!(last_commit_epoch(temp.path(), "src/lib.rs"), 0);
    }

    #[test]
    fn modified_paths_fall_back_to_empty() {
        let temp = tempdir().unwrap();
        assert!(modified_paths(temp.path()).is_empty());
    }
}
