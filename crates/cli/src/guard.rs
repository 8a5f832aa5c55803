use brief_protocol::paths;
use std::path::Path;

/// Paths version control reports as modified that are outside the tool's
/// own output directories and control files.
///
/// The guard is the strongest invariant of a run: this tool never mutates
/// the source tree, and any modification outside the allow-set fails the
/// process regardless of every other gate.
pub fn violations(root: &Path) -> Vec<String> {
    brief_vcs::modified_paths(root)
        .into_iter()
        .filter(|path| !paths::is_self_output(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_repository_means_no_violations() {
        let temp = tempdir().unwrap();
        assert!(violations(temp.path()).is_empty());
    }
}
