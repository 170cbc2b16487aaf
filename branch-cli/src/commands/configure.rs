//! Configure command - persist credentials to the config file.

use std::path::Path;

use console::style;
use tracing::info;

use branch_core::config::AppConfig;
use branch_core::error::BranchResult;

/// Run the configure command.
pub fn run(config: &AppConfig, path: &Path) -> BranchResult<()> {
    config.branch.require_key()?;
    config.save_to_file(path)?;
    info!("saved config to {}", path.display());

    println!(
        "{} Saved credentials for key {} to {}",
        style("OK").green().bold(),
        config.branch.branch_key,
        path.display()
    );
    if config.branch.branch_secret.is_empty() {
        println!(
            "  {} no secret configured; `update` will be unavailable",
            style("note:").yellow()
        );
    }
    Ok(())
}
