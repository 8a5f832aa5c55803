//! # Brief Config
//!
//! Typed view of `REPOBRIEF.yaml`. A missing file or unparseable document
//! is fatal; everything inside the document has a sensible default except
//! the token budget, which must be stated explicitly.

use brief_protocol::{AliasRule, DepKind, FreshnessParsePolicy, RepoLink, SanityMode, CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;

pub use error::{ConfigError, Result};

/// Default deny set: common heavy/hidden directories plus binary blobs.
pub const DEFAULT_DENY: &[&str] = &[
    "**/node_modules/**",
    "**/build/**",
    "**/.*/**",
    "**/.git/**",
    "**/*.png",
    "**/*.jpg",
    "**/*.jpeg",
    "**/*.gif",
    "**/*.mp4",
    "**/*.mov",
    "**/*.avi",
    "**/*.mkv",
    "**/*.pt",
    "**/*.onnx",
    "**/*.ckpt",
    "**/*.bin",
    "**/*.pb",
    "**/*.so",
    "**/*.dylib",
    "**/*.a",
    "**/*.o",
    "**/*.zip",
    "**/*.tar",
    "**/*.gz",
    "**/*.7z",
    "**/*.pdf",
    "**/*.ico",
];

/// Default allow: everything (deny and content checks still apply).
pub const DEFAULT_ALLOW: &[&str] = &["**/*"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub rare_facts: RareFacts,
    #[serde(default)]
    pub pack: PackConfig,
    /// Required: a pack without a stated budget is meaningless.
    pub budgets: Budgets,
    #[serde(default)]
    pub deps: DepsConfig,
    #[serde(default)]
    pub evals: EvalsConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

impl Config {
    /// Load `REPOBRIEF.yaml` from the repo root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Err(ConfigError::Missing(path));
        }
        let raw = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,
    #[serde(default = "default_deny")]
    pub deny: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            allow: default_allow(),
            deny: default_deny(),
        }
    }
}

fn default_allow() -> Vec<String> {
    DEFAULT_ALLOW.iter().map(|s| (*s).to_string()).collect()
}

fn default_deny() -> Vec<String> {
    DEFAULT_DENY.iter().map(|s| (*s).to_string()).collect()
}

/// Facts whose absence forces abstention before packing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RareFacts {
    /// Environment variables that must be set.
    #[serde(default)]
    pub env: Vec<String>,
    /// Literal tokens that must occur somewhere in the tree.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Path-like tokens that must occur somewhere in the tree.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl RareFacts {
    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.flags.is_empty() && self.paths.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    #[serde(default = "default_snippet_lines")]
    pub per_file_snippet_lines: usize,
    #[serde(default = "default_tail_lines")]
    pub tail_lines_on_truncate: usize,
    /// `largest_function` adds a mid anchor to truncated files.
    #[serde(default)]
    pub mid_block_pick: Option<MidBlockPick>,
    /// No kind runs unless listed here.
    #[serde(default)]
    pub dependency_kinds: Vec<DepKind>,
    /// Render the dependency graph block.
    #[serde(default = "default_true")]
    pub dependencies: bool,
    #[serde(default = "default_true")]
    pub secret_scrub: bool,
    /// Write the pack even when a rare fact forces abstention.
    #[serde(default = "default_true")]
    pub abstain_writes_pack: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            per_file_snippet_lines: default_snippet_lines(),
            tail_lines_on_truncate: default_tail_lines(),
            mid_block_pick: None,
            dependency_kinds: Vec::new(),
            dependencies: true,
            secret_scrub: true,
            abstain_writes_pack: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidBlockPick {
    LargestFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budgets {
    /// Hard token ceiling for the whole pack. Required.
    pub token_limit: u64,
    /// Label only; recorded in the pack header.
    #[serde(default = "default_encoder")]
    pub encoder: String,
    /// Label recorded when the pack was not truncated.
    #[serde(default = "default_limiter")]
    pub limiter: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepsConfig {
    #[serde(default)]
    pub sanity_mode: SanityMode,
    /// Targets matching any of these regexes are dropped silently.
    #[serde(default)]
    pub ignore_targets: Vec<String>,
    #[serde(default)]
    pub path_aliases: Vec<AliasRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalsConfig {
    #[serde(default = "default_true")]
    pub pack_freshness: bool,
    #[serde(default)]
    pub freshness_on_parse_error: FreshnessParsePolicy,
    /// Below this internal-dependency resolution ratio, a human-review
    /// question is appended to the progress log. Advisory only.
    #[serde(default)]
    pub human_review_if_coverage_below: f64,
}

impl Default for EvalsConfig {
    fn default() -> Self {
        Self {
            pack_freshness: true,
            freshness_on_parse_error: FreshnessParsePolicy::default(),
            human_review_if_coverage_below: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default)]
    pub repos: Vec<RepoLink>,
}

fn default_true() -> bool {
    true
}

fn default_snippet_lines() -> usize {
    180
}

fn default_tail_lines() -> usize {
    40
}

fn default_encoder() -> String {
    "chars-div-4".to_string()
}

fn default_limiter() -> String {
    "within_budget".to_string()
}
