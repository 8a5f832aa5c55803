use crate::error::{Result, ScopeError};
use brief_protocol::paths;
use brief_protocol::IGNORE_FILE;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};

const BINARY_SNIFF_BYTES: usize = 4096;

/// Resolves the ordered set of repo-relative paths eligible for packing.
///
/// Pattern semantics are case-sensitive shell globs over the forward-slash
/// relative path, where `*` may cross directory separators. Deny and
/// ignore-file patterns always win over allow.
#[derive(Debug)]
pub struct ScopeResolver {
    root: PathBuf,
    allow: GlobSet,
    deny: GlobSet,
    ignores: GlobSet,
}

impl ScopeResolver {
    pub fn new(root: impl AsRef<Path>, allow: &[String], deny: &[String]) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let ignores = compile_lenient(&load_ignore_patterns(&root));
        Ok(Self {
            allow: compile_strict(allow)?,
            deny: compile_strict(deny)?,
            ignores,
            root,
        })
    }

    /// Enumerate the working tree in sorted order and keep every regular,
    /// non-binary file that survives the pattern rules. Re-running over an
    /// unchanged tree yields the identical ordered list.
    pub fn resolve(&self) -> Vec<String> {
        let mut out = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .sort_by_file_path(|a, b| a.cmp(b));

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            let Some(rel) = paths::relative_to_root(&self.root, path) else {
                continue;
            };
            if self.accepts(&rel, path) {
                out.push(rel);
            }
        }

        log::info!("Scope resolved to {} files", out.len());
        out
    }

    /// All rules in precedence order; `path` is consulted only for the
    /// binary sniff.
    pub fn accepts(&self, rel: &str, path: &Path) -> bool {
        if paths::is_self_output(rel) {
            return false;
        }
        if self.deny.is_match(rel) {
            return false;
        }
        if self.ignores.is_match(rel) {
            return false;
        }
        if is_binary(path) {
            return false;
        }
        self.allow.is_match(rel)
    }
}

/// Lines from the two well-known ignore files, comments and blanks
/// stripped. Both files are optional.
fn load_ignore_patterns(root: &Path) -> Vec<String> {
    let mut patterns = Vec::new();
    for name in [".gitignore", IGNORE_FILE] {
        let Ok(raw) = std::fs::read_to_string(root.join(name)) else {
            continue;
        };
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            patterns.push(line.to_string());
        }
    }
    patterns
}

fn compile_strict(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScopeError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|source| ScopeError::InvalidPattern {
            pattern: String::new(),
            source,
        })
}

/// Ignore files may carry syntax we do not understand; bad lines are
/// skipped, not fatal.
fn compile_lenient(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => log::warn!("Skipping unparseable ignore pattern {pattern:?}: {e}"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("Failed to build ignore set: {e}");
        GlobSet::empty()
    })
}

/// NUL byte in the first 4 KiB marks a file binary; unreadable files are
/// conservatively treated as binary.
fn is_binary(path: &Path) -> bool {
    let Ok(mut file) = std::fs::File::open(path) else {
        return true;
    };
    let mut chunk = [0u8; BINARY_SNIFF_BYTES];
    let read = match file.read(&mut chunk) {
        Ok(read) => read,
        Err(_) => return true,
    };
    chunk[..read].contains(&0)
}
