//! `penpal serve` — load config, build the provider, run the HTTP gateway.
//!
//! Startup sequence:
//! 1. Load config (file + env), apply `--host` / `--port`
//! 2. Build handler state (provider + letter settings)
//! 3. Bind the listener
//! 4. Serve until Ctrl+C, letting in-flight requests finish

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::info;

use penpal_core::config::{load_config, Config};
use penpal_gateway::{build_state, serve, shutdown_signal};

use crate::helpers;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file (default: ~/.penpal/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,
}

/// Run the gateway.
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args);
    let addr = config.gateway.bind_addr();

    println!();
    helpers::print_banner();
    println!("  Model:     {}", config.letters.model);
    println!("  Language:  {}", config.letters.language);
    println!("  Listening: http://{}", addr);
    println!();
    println!("  Ctrl+C to stop");
    println!();

    let state = build_state(&config);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(addr = %addr, model = %config.letters.model, "gateway starting");

    serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    println!("  Gateway stopped. Goodbye!");
    Ok(())
}

/// Load config and apply command-line overrides.
fn resolve_config(args: &ServeArgs) -> Config {
    let mut config = load_config(args.config.as_deref());
    if let Some(ref host) = args.host {
        config.gateway.host = host.clone();
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    config
}
