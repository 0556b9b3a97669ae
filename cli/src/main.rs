//! emtsim - terminal driver for the EMT primary assessment engine
//!
//! # Commands
//! - `emtsim run [--config PATH] [--no-pacing] [--report PATH]` - run one patient interactively
//! - `emtsim outline` - print the trauma protocol's stage list as JSON

mod outline;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// EMT primary assessment simulator
#[derive(Parser)]
#[command(name = "emtsim")]
#[command(author, version, about = "Interactive EMT primary assessment simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulated patient on this terminal
    Run {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print narration without pacing delays
        #[arg(long)]
        no_pacing: bool,

        /// Write the JSON run report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print the trauma protocol outline as JSON
    Outline {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            no_pacing,
            report,
        } => {
            init_tracing("warn");
            run::run_command(config.as_deref(), no_pacing, report.as_deref()).await
        }
        Commands::Outline { output } => {
            init_tracing("info");
            outline::run_outline_command(output.as_deref())
        }
    }
}
