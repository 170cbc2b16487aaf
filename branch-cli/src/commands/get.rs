//! Get command - print a deep link's description.

use branch_api::CancellationToken;
use branch_core::config::AppConfig;
use branch_core::error::BranchResult;

/// Run the get command.
pub async fn run(config: &AppConfig, cancel: &CancellationToken, url: &str) -> BranchResult<()> {
    config.branch.require_key()?;
    let api = super::create_api_client(&config.branch)?;

    let pretty = api.get_link(cancel, url).await?;
    println!("{pretty}");
    Ok(())
}
