use anyhow::{Context, Result};
use clap::Parser;
use giveaway_cli::{execute, Command, Config};
use giveaway_execution::{Contest, FileSnapshotStore, SnapshotStore};
use giveaway_types::UserId;
use std::{path::PathBuf, str::FromStr};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a referral giveaway contest")]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot file (overrides config)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// RNG seed for reproducible codes and draws (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Identity the command is run as
    #[arg(long = "as")]
    caller: Option<UserId>,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(config: &Config) -> Result<()> {
    let level = Level::from_str(&config.log_level)
        .with_context(|| format!("Invalid log level {}", config.log_level))?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if config.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load from config file, then apply overrides
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(snapshot) = args.snapshot {
        config.snapshot_path = snapshot;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    init_logging(&config)?;

    // Restore contest state
    let mut store = FileSnapshotStore::new(&config.snapshot_path);
    let mut contest = Contest::new(config.contest());
    if let Some(snapshot) = store.load().context("Failed to load snapshot")? {
        contest
            .restore(snapshot)
            .context("Failed to restore snapshot")?;
    }
    let restored = contest.revision();

    // Run command
    let output = execute(&mut contest, args.caller, args.command)?;
    print!("{output}");

    // Persist if anything changed
    if contest.revision() != restored {
        store
            .save(&contest.snapshot())
            .context("Failed to save snapshot")?;
        info!(
            path = %config.snapshot_path.display(),
            revision = contest.revision(),
            "saved snapshot"
        );
    }
    Ok(())
}
