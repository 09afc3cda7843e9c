//! Facemouse CLI: hands-free pointer control from face and hand landmarks.
//!
//! Usage:
//!   facemouse run [OPTIONS]        Drive the pointer from a landmark stream
//!   facemouse simulate [OPTIONS]   Write a scripted demo landmark stream
//!   facemouse check                Check pointer-control prerequisites

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facemouse_common::config::LoggingConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "facemouse",
    about = "Move the pointer with your head, click by opening your mouth",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller until Ctrl+C or the end of the landmark stream
    Run(commands::run::RunArgs),

    /// Write a synthetic landmark stream (usable as `run --input`)
    Simulate {
        /// Frames to hold each scripted pose
        #[arg(long, default_value = "15")]
        hold: usize,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the pointer can be driven on this desktop
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: if cli.verbose { "debug" } else { "info" }.to_string(),
        json: cli.json_logs,
    };
    facemouse_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, logging).await,
        Commands::Simulate { hold, output } => commands::simulate::run(hold, output),
        Commands::Check => commands::check::run(),
    }
}
