//! `penpal onboard` — write a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use penpal_core::config::{get_config_path, save_config, Config};

/// Run the onboard command. `path` defaults to `~/.penpal/config.json`.
pub fn run(path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "✉️  Penpal — Setup".cyan().bold());
    println!();

    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        save_config(&Config::default(), Some(&config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!(
        "  Add an API key under {} or export {}.",
        "providers".bold(),
        "OPENAI_API_KEY".bold()
    );
    println!(
        "{}",
        "  Setup complete! Run `penpal serve` to start the gateway.".green()
    );
    println!();

    Ok(())
}
