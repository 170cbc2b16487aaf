//! Create command - create a deep link and print its URL.

use console::style;

use branch_api::CancellationToken;
use branch_core::config::AppConfig;
use branch_core::error::BranchResult;

use super::LinkArgs;
use crate::OutputFormat;

/// Run the create command.
pub async fn run(
    config: &AppConfig,
    cancel: &CancellationToken,
    link: LinkArgs,
    format: OutputFormat,
) -> BranchResult<()> {
    config.branch.require_key()?;
    let api = super::create_api_client(&config.branch)?;

    let url = api
        .create_link(cancel, &link.properties(), &link.metadata(), &link.custom_data())
        .await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "url": url }));
        }
        OutputFormat::Text => {
            eprintln!("{} deep link created", style("OK").green().bold());
            println!("{url}");
        }
    }
    Ok(())
}
