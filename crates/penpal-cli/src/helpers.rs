//! Shared CLI helpers — banner and status marks.

use colored::Colorize;

/// Print the banner shown at startup.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "{}  v{}",
        "✉️  Penpal".cyan().bold(),
        version.dimmed()
    );
}

/// `✓ (key set)` or `· not configured`.
pub fn key_status(configured: bool) -> String {
    if configured {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

/// `✓` when a path exists, `(not found)` otherwise.
pub fn exists_mark(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}
