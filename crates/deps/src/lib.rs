//! # Brief Deps
//!
//! Best-effort dependency handling: heuristic edge extraction, a deduped
//! directed graph for rendering, a filesystem sanity check for internal
//! targets, and the cross-repository hub stitcher. Everything here is
//! advisory; nothing raises on a lookup miss.

mod extractor;
mod graph;
mod hub;
mod sanity;

pub use extractor::extract_edges;
pub use graph::DepGraph;
pub use hub::{stitch_hub, HubGraph};
pub use sanity::{check_sanity, SanityReport};
