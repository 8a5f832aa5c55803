use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::command::RunStatus;
use crate::context::RunContext;

mod command;
mod context;
mod facts;
mod guard;
mod plan;

#[derive(Parser)]
#[command(name = "repobrief")]
#[command(about = "Budgeted repository packs for automated reviewers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pack once
    Run,

    /// Re-run the full pipeline whenever in-scope files change
    Watch(WatchArgs),

    /// Cross-repository hub graph
    Hub(HubArgs),
}

#[derive(Args)]
struct WatchArgs {
    /// Poll interval in seconds
    #[arg(long, default_value_t = 2)]
    interval_secs: u64,
}

#[derive(Args)]
struct HubArgs {
    #[command(subcommand)]
    action: HubAction,
}

#[derive(Subcommand)]
enum HubAction {
    /// Stitch linked packs into repobrief/hub/graph.md
    Build,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match dispatch(cli) {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<RunStatus> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let ctx = RunContext::load(root)?;

    match cli.command {
        Commands::Run => command::run::execute(&ctx),
        Commands::Watch(args) => {
            command::watch::execute(&ctx, Duration::from_secs(args.interval_secs.max(1)))
        }
        Commands::Hub(args) => match args.action {
            HubAction::Build => command::hub::build(&ctx),
        },
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
