use anyhow::{Context as AnyhowContext, Result};
use brief_config::Config;
use std::path::PathBuf;

/// Explicit per-invocation context: the repository root and the loaded
/// configuration, threaded through every component call. There is no
/// ambient global root.
pub struct RunContext {
    pub root: PathBuf,
    pub config: Config,
}

impl RunContext {
    pub fn load(root: PathBuf) -> Result<Self> {
        let config = Config::load(&root)
            .with_context(|| format!("loading configuration under {}", root.display()))?;
        Ok(Self { root, config })
    }
}
