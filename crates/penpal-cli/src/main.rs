//! Penpal CLI — entry point.
//!
//! # Commands
//!
//! - `penpal serve [--host H] [--port P] [--config PATH] [--logs]` — run the HTTP gateway
//! - `penpal status [--config PATH]` — show configuration and provider status
//! - `penpal onboard` — write a default config file

mod helpers;
mod onboard;
mod serve;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ✉️ Penpal — style analysis and letter writing over HTTP
#[derive(Parser)]
#[command(name = "penpal", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve(serve::ServeArgs),

    /// Show configuration and provider status
    Status {
        /// Config file (default: ~/.penpal/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default config to ~/.penpal/config.json
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging(args.logs);
            serve::run(args).await
        }
        Commands::Status { config } => status::run(config.as_deref()),
        Commands::Onboard => onboard::run(None),
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "penpal=debug,tower_http=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
