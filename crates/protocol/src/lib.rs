//! # Brief Protocol
//!
//! Shared data model for the pack pipeline.
//!
//! ```text
//! Directory
//!     │
//!     ├──> Scope Resolver
//!     │      └─> FileCandidate (path, language, line count)
//!     │
//!     ├──> Dependency Extractor
//!     │      └─> DependencyEdge (source, target, kind)
//!     │
//!     └──> Budget / Anchors / Writer
//!            └─> PackedEntry + Anchor + PackTotals
//! ```

use serde::{Deserialize, Serialize};

pub mod paths;

pub const PACK_FORMAT_VERSION: &str = "1.0";

/// Directory the tool writes its pack into, relative to the repo root.
pub const OUTPUT_DIR: &str = "repobrief";
/// Hidden scratch directory the tool may also own.
pub const HIDDEN_OUTPUT_DIR: &str = ".repobrief";
/// Append-only progress log at the repo root.
pub const PLAN_FILE: &str = "PLAN.md";
/// Configuration file at the repo root.
pub const CONFIG_FILE: &str = "REPOBRIEF.yaml";
/// Tool-specific ignore file, same line format as `.gitignore`.
pub const IGNORE_FILE: &str = ".repobriefignore";

/// Kind of a heuristically detected dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepKind {
    Import,
    Call,
    AsyncCall,
    Http,
    Db,
    Queue,
}

impl DepKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DepKind::Import => "import",
            DepKind::Call => "call",
            DepKind::AsyncCall => "async_call",
            DepKind::Http => "http",
            DepKind::Db => "db",
            DepKind::Queue => "queue",
        }
    }

    /// External kinds point at things that are never files in this tree, so
    /// the sanity checker accepts them unconditionally.
    pub const fn is_external(self) -> bool {
        matches!(self, DepKind::Http | DepKind::Db | DepKind::Queue)
    }

    pub const ALL: [DepKind; 6] = [
        DepKind::Import,
        DepKind::Call,
        DepKind::AsyncCall,
        DepKind::Http,
        DepKind::Db,
        DepKind::Queue,
    ];
}

/// A file accepted by the scope resolver. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Repo-relative, forward-slash normalized.
    pub path: String,
    /// Inferred from the extension; empty string when unknown.
    pub language: String,
    pub line_count: usize,
}

/// A candidate plus its full text, as the pipeline carries it.
///
/// `truncated` is set once by the budget accountant and read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedEntry {
    pub candidate: FileCandidate,
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl PackedEntry {
    pub fn new(path: String, language: String, lines: Vec<String>) -> Self {
        let candidate = FileCandidate {
            path,
            language,
            line_count: lines.len(),
        };
        Self {
            candidate,
            lines,
            truncated: false,
        }
    }

    /// Character count of the text as rendered (lines joined by `\n`).
    pub fn char_count(&self) -> usize {
        let newlines = self.lines.len().saturating_sub(1);
        self.lines.iter().map(String::len).sum::<usize>() + newlines
    }
}

/// Directed dependency edge `(source file, raw target, kind)`.
///
/// Targets are raw matched strings; duplicates are suppressed at render
/// time only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub kind: DepKind,
}

impl DependencyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: DepKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Inclusive 1-based line range selected for excerpting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub start: usize,
    pub end: usize,
}

impl Anchor {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(self) -> bool {
        self.end < self.start
    }
}

/// Write-once run summary consumed by the pack writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackTotals {
    /// ISO-8601 UTC generation timestamp, second precision.
    pub generated: String,
    pub files_packed: usize,
    pub tokens_total: u64,
    pub duration_ms: u64,
    pub dep_missing: usize,
    /// `None` when the freshness eval is disabled.
    pub fresh: Option<bool>,
}

/// Operating mode of the dependency sanity checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanityMode {
    Off,
    #[default]
    Warn,
    Strict,
}

/// What the freshness evaluator reports when the generation timestamp
/// itself cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessParsePolicy {
    /// Fail closed: an unparseable timestamp reads as stale.
    #[default]
    Stale,
    /// Fail open: an unparseable timestamp reads as fresh.
    Fresh,
}

/// Target-rewriting rule for internal dependency resolution: regex match
/// plus substitution. Never used for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub from: String,
    pub to: String,
}

/// A sibling repository whose pack the hub stitcher reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLink {
    pub name: String,
    pub pack_uri: String,
}

/// Conservative token estimate from a character count.
pub fn approx_tokens(chars: usize) -> u64 {
    ((chars / 4) as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn approx_tokens_is_at_least_one() {
        assert_eq!(approx_tokens(0), 1);
        assert_eq!(approx_tokens(3), 1);
        assert_eq!(approx_tokens(4), 1);
        assert_eq!(approx_tokens(400), 100);
    }

    #[test]
    fn char_count_matches_joined_text() {
        let entry = PackedEntry::new(
            "src/a.py".to_string(),
            "python".to_string(),
            vec!["abc".to_string(), "de".to_string()],
        );
        assert_eq!(entry.char_count(), "abc\nde".len());
        assert_eq!(entry.candidate.line_count, 2);
        assert!(!entry.truncated);
    }

    #[test]
    fn dep_kind_external_split() {
        assert!(DepKind::Http.is_external());
        assert!(DepKind::Db.is_external());
        assert!(DepKind::Queue.is_external());
        assert!(!DepKind::Import.is_external());
        assert!(!DepKind::Call.is_external());
        assert!(!DepKind::AsyncCall.is_external());
    }

    #[test]
    fn dep_kind_serde_uses_snake_case() {
        let kind: DepKind = serde_json::from_str("\"async_call\"").unwrap();
        assert_eq!(kind, DepKind::AsyncCall);
        assert_eq!(serde_json::to_string(&DepKind::Import).unwrap(), "\"import\"");
    }
}
