//! planear-demo
//!
//! Usage:
//!   planear-demo plan --csv-dir data/ --remote remote.json
//!   planear-demo apply --remote remote.json --report report.json

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use planear::ReconcileConfig;
use planear_cli::{RunOptions, Theme, run_apply, run_plan};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "planear-demo")]
#[command(about = "Plan and apply user record changes against a JSON file")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to the config file (defaults to ./planear.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Diff local CSV records against the remote file and save a plan
    Plan {
        /// Directory of CSV files with the desired records
        #[arg(long)]
        csv_dir: PathBuf,

        /// JSON file holding the current records
        #[arg(long)]
        remote: PathBuf,

        /// Where to save the plan (overrides the config)
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Apply a saved plan to the remote file
    Apply {
        /// JSON file holding the current records
        #[arg(long)]
        remote: PathBuf,

        /// Plan to apply (overrides the config)
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Make every operation on this key fail (repeatable)
        #[arg(long = "fail-key")]
        fail_keys: Vec<String>,

        /// Write a JSON copy of the execution report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ReconcileConfig::load_from(path),
        None => ReconcileConfig::load(),
    };
    let mut options = RunOptions::new(config);
    options.theme = Theme::with_color(options.config.color && io::stdout().is_terminal());

    let mut stdout = io::stdout().lock();
    match args.command {
        Command::Plan {
            csv_dir,
            remote,
            plan,
        } => {
            options.plan_path = plan;
            let plan = run_plan(csv_dir, remote, &options, &mut stdout)?;
            info!("Plan has {} action(s)", plan.summary().total());
        }
        Command::Apply {
            remote,
            plan,
            fail_keys,
            report,
        } => {
            options.plan_path = plan;
            let report = run_apply(remote, fail_keys, report, &options, &mut stdout)?;
            info!("Applied {} operation(s)", report.succeeded_count());
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
