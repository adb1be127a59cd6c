//! `penpal status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use penpal_core::config::{get_config_path, load_config};
use penpal_providers::registry::{find_by_model, PROVIDERS};

use crate::helpers::{exists_mark, key_status};

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let letters = &config.letters;

    println!();
    println!("{}", "✉️  Penpal Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        exists_mark(path.exists())
    );

    let routed = find_by_model(&letters.model)
        .map(|spec| spec.display_name)
        .unwrap_or("gateway fallback");
    println!(
        "  {:<18} {} {}",
        "Model:".bold(),
        letters.model,
        format!("→ {}", routed).dimmed()
    );

    println!(
        "  {:<18} {} | max_tokens: {} | json_mode: {}",
        "Parameters:".bold(),
        format!("temp: {}", letters.temperature).dimmed(),
        format!("{}", letters.max_tokens).dimmed(),
        format!("{}", letters.json_mode).dimmed(),
    );
    println!(
        "  {:<18} {} | timeout: {}s",
        "Prompts:".bold(),
        letters.language,
        letters.timeout_secs
    );
    println!(
        "  {:<18} {}",
        "Listen:".bold(),
        config.gateway.bind_addr()
    );

    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();
    for spec in PROVIDERS {
        let configured = providers_map
            .get(spec.name)
            .is_some_and(|c| c.is_configured());
        println!("    {:<20} {}", spec.display_name, key_status(configured));
    }

    println!();

    Ok(())
}
