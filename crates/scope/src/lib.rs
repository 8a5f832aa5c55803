//! # Brief Scope
//!
//! Decides which files qualify for packing: allow/deny globs, ignore-file
//! rules, self-output exclusion, and a binary sniff. Read-only over the
//! tree.

mod error;
mod resolver;

pub use error::{Result, ScopeError};
pub use resolver::ScopeResolver;
