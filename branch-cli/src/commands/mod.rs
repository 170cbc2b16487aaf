//! CLI command implementations.

pub mod configure;
pub mod create;
pub mod get;
pub mod update;

use clap::Args;
use serde_json::Value;

use branch_api::{BranchClient, CustomData, DeepLinkData, DeepLinkProperties};
use branch_core::config::BranchConfig;
use branch_core::error::BranchResult;

/// Link fields shared by `create` and `update`.
#[derive(Debug, Default, Args)]
pub struct LinkArgs {
    /// Channel the link is shared on (e.g. facebook, email).
    #[arg(long)]
    pub channel: Option<String>,
    /// Feature the link belongs to (e.g. sharing, invite).
    #[arg(long)]
    pub feature: Option<String>,
    /// Stage of the user journey.
    #[arg(long)]
    pub stage: Option<String>,
    /// Campaign name.
    #[arg(long)]
    pub campaign: Option<String>,
    /// Custom alias for the short link.
    #[arg(long)]
    pub alias: Option<String>,
    /// Link type (0 = regular, 1 = one-time use, 2 = marketing).
    #[arg(long = "type", default_value_t = 0)]
    pub link_type: i64,
    /// Tag to attach (repeatable).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Identity of the user creating the link.
    #[arg(long)]
    pub identity: Option<String>,
    /// Canonical identifier of the linked content.
    #[arg(long)]
    pub canonical_id: Option<String>,
    /// Open Graph title.
    #[arg(long)]
    pub og_title: Option<String>,
    /// Open Graph description.
    #[arg(long)]
    pub og_description: Option<String>,
    /// Open Graph image URL.
    #[arg(long)]
    pub og_image_url: Option<String>,
    /// Fallback URL for desktop browsers.
    #[arg(long)]
    pub desktop_url: Option<String>,
    /// Custom data entry as KEY=VALUE (repeatable). VALUE is parsed as JSON
    /// when possible and sent as a string otherwise.
    #[arg(short, long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub data: Vec<(String, Value)>,
}

impl LinkArgs {
    pub fn properties(&self) -> DeepLinkProperties {
        DeepLinkProperties {
            channel: self.channel.clone().unwrap_or_default(),
            feature: self.feature.clone().unwrap_or_default(),
            stage: self.stage.clone().unwrap_or_default(),
            campaign: self.campaign.clone().unwrap_or_default(),
            alias: self.alias.clone().unwrap_or_default(),
            link_type: self.link_type,
            tags: self.tags.clone(),
            identity: self.identity.clone().unwrap_or_default(),
            data: CustomData::new(),
        }
    }

    pub fn metadata(&self) -> DeepLinkData {
        DeepLinkData {
            canonical_identifier: self.canonical_id.clone().unwrap_or_default(),
            og_title: self.og_title.clone().unwrap_or_default(),
            og_description: self.og_description.clone().unwrap_or_default(),
            og_image_url: self.og_image_url.clone().unwrap_or_default(),
            desktop_url: self.desktop_url.clone().unwrap_or_default(),
        }
    }

    /// Custom data entries; a repeated key keeps its last value.
    pub fn custom_data(&self) -> CustomData {
        self.data.iter().cloned().collect()
    }
}

/// Parse a `KEY=VALUE` argument.
pub fn parse_key_value(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{arg}`"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Helper to create an API client from config.
pub fn create_api_client(config: &BranchConfig) -> BranchResult<BranchClient> {
    BranchClient::from_config(config)
}
