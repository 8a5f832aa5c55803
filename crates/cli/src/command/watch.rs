use crate::command::{run, RunStatus};
use crate::context::RunContext;
use anyhow::{Context as AnyhowContext, Result};
use brief_protocol::paths;
use notify::{PollWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

/// Repeat the full pipeline whenever an in-scope file changes.
///
/// Mtime-based polling at a fixed interval; each detected change triggers
/// one complete, independent run. Runs are never overlapped. A failing run
/// ends the watch with that run's status.
pub fn execute(ctx: &RunContext, interval: Duration) -> Result<RunStatus> {
    let (tx, rx) = mpsc::channel();
    let notify_config = notify::Config::default()
        .with_poll_interval(interval)
        .with_compare_contents(false);
    let mut watcher = PollWatcher::new(
        move |event| {
            let _ = tx.send(event);
        },
        notify_config,
    )
    .context("starting filesystem watcher")?;
    watcher
        .watch(&ctx.root, RecursiveMode::Recursive)
        .context("watching repository root")?;

    log::info!(
        "Watching {} every {}s; Ctrl+C to stop",
        ctx.root.display(),
        interval.as_secs()
    );

    loop {
        let first = rx.recv().context("watcher channel closed")?;
        let mut changed = relevant_paths(&ctx.root, first);
        while let Ok(event) = rx.try_recv() {
            changed.extend(relevant_paths(&ctx.root, event));
        }
        changed.sort();
        changed.dedup();
        if changed.is_empty() {
            continue;
        }

        log::info!("Changed: {}", preview(&changed));
        let status = run::execute(ctx)?;
        if status != RunStatus::Success {
            return Ok(status);
        }
    }
}

/// Event paths that belong to the watched tree and are not the tool's own
/// outputs (which every run rewrites) or git internals.
fn relevant_paths(root: &Path, event: notify::Result<notify::Event>) -> Vec<String> {
    let event = match event {
        Ok(event) => event,
        Err(e) => {
            log::warn!("Watcher error: {e}");
            return Vec::new();
        }
    };
    event
        .paths
        .iter()
        .filter_map(|path| paths::relative_to_root(root, path))
        .filter(|rel| !paths::is_self_output(rel) && !rel.starts_with(".git/"))
        .collect()
}

fn preview(changed: &[String]) -> String {
    const SHOWN: usize = 5;
    let mut out = changed.iter().take(SHOWN).cloned().collect::<Vec<_>>().join(", ");
    if changed.len() > SHOWN {
        out.push_str(", …");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn event_for(paths: Vec<PathBuf>) -> notify::Result<notify::Event> {
        let mut event = notify::Event::new(notify::EventKind::Modify(
            notify::event::ModifyKind::Any,
        ));
        event.paths = paths;
        Ok(event)
    }

    #[test]
    fn own_outputs_never_retrigger_a_run() {
        let root = PathBuf::from("/repo");
        let rels = relevant_paths(
            &root,
            event_for(vec![
                root.join("repobrief/pack/PACK.md"),
                root.join("PLAN.md"),
                root.join(".git/index"),
                root.join("src/app.py"),
            ]),
        );
        assert_eq!(rels, vec!["src/app.py".to_string()]);
    }

    #[test]
    fn preview_truncates_long_change_lists() {
        let changed: Vec<String> = (0..8).map(|i| format!("f{i}")).collect();
        assert!(preview(&changed).ends_with("…"));
        assert_eq!(preview(&changed[..2]), "f0, f1");
    }
}
