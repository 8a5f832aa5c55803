//! # Brief Heuristics
//!
//! Regex-level language heuristics shared by the dependency extractor and
//! the anchor selector. No parsing, no ASTs: a small per-language table of
//! patterns, so new languages are added by data rather than code.

mod language;
mod rules;

pub use language::Language;
pub use rules::{
    rules_for, LanguageRules, ASYNC_CALL_PATTERN, BARE_CALL_PATTERN, QUEUE_CALL_PATTERN,
    SQL_KEYWORD_PATTERN, URL_PATTERN,
};
