//! protoregen - installs the protobuf plugin and regenerates bindings when schemas change.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use protoregen_core::impls::{JsonHashStore, ProcessRunner};
use protoregen_core::{
    BuildError, ConfigError, Context, GenConfig, ResolvedEnv, RunReport, standard_pipeline,
};

#[derive(Parser)]
#[command(name = "protoregen")]
#[command(about = "Install the protobuf plugin and regenerate bindings from changed schemas")]
struct Args {
    /// JSON config file (defaults are used when omitted)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every stale task (default)
    Run {
        /// Treat every task as stale
        #[arg(long)]
        force: bool,
    },
    /// Report which tasks would run, without running them
    Check,
    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "protoregen=debug,protoregen_core=debug"
    } else {
        "protoregen=info,protoregen_core=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = GenConfig::load(args.config.as_deref())?;

    let (check_only, force) = match args.command.unwrap_or(Command::Run { force: false }) {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        Command::Check => (true, false),
        Command::Run { force } => (false, force),
    };

    let env = ResolvedEnv::from_process(&config)?;
    info!(root = %env.root.display(), "resolved {}", config.root_env);

    let store = JsonHashStore::open(&config.hash_store)
        .await
        .with_context(|| format!("opening {}", config.hash_store.display()))?;
    let context = Context::new(Arc::new(ProcessRunner::new()), Arc::new(store));
    let pipeline = standard_pipeline(&config, &env, context, force)?;

    if check_only {
        let report = pipeline.check().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let report = pipeline.run().await?;
        log_summary(&report);
    }
    Ok(())
}

fn log_summary(report: &RunReport) {
    let counts = report.counts();
    info!(ran = counts.ran, skipped = counts.skipped, "done");
}

/// 2 for configuration problems, 1 for everything else (failed tools included).
fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() || err.downcast_ref::<BuildError>().is_some() {
        2
    } else {
        1
    }
}
