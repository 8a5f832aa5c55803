use crate::command::RunStatus;
use crate::context::RunContext;
use anyhow::{Context as AnyhowContext, Result};
use brief_deps::stitch_hub;
use brief_protocol::OUTPUT_DIR;

/// Stitch the dependency graphs of linked sibling packs into one hub
/// graph document.
pub fn build(ctx: &RunContext) -> Result<RunStatus> {
    let hub = stitch_hub(&ctx.root, &ctx.config.links.repos);

    let path = ctx.root.join(OUTPUT_DIR).join("hub").join("graph.md");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("creating hub directory")?;
    }
    let mut content = hub.render();
    content.push('\n');
    std::fs::write(&path, content).context("writing hub graph")?;

    if !hub.broken.is_empty() {
        log::warn!("{} broken pack link(s)", hub.broken.len());
    }
    log::info!("Hub graph written to {}", path.display());
    Ok(RunStatus::Success)
}
