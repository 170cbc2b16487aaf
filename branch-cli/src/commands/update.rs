//! Update command - change an existing deep link.

use branch_api::CancellationToken;
use branch_core::config::AppConfig;
use branch_core::error::BranchResult;

use super::LinkArgs;

/// Run the update command. Needs the access secret as well as the key.
pub async fn run(
    config: &AppConfig,
    cancel: &CancellationToken,
    url: &str,
    link: LinkArgs,
) -> BranchResult<()> {
    config.branch.require_secret()?;
    let api = super::create_api_client(&config.branch)?;

    let pretty = api
        .update_link(cancel, url, &link.properties(), &link.metadata(), &link.custom_data())
        .await?;
    println!("{pretty}");
    Ok(())
}
