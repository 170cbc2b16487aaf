//! Deep-link endpoints: create, read, and update a link.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

use branch_core::constants::{params, DEEP_LINK_PATH};
use branch_core::error::BranchResult;

use crate::client::BranchClient;
use crate::params::{build_parameters, CustomData, DeepLinkData, DeepLinkProperties};
use crate::response::{parse_url, pretty_json};

/// The deep-link operations, as a trait so callers can substitute a fake.
#[async_trait]
pub trait DeepLinkApi: Send + Sync {
    /// Create a deep link and return its URL.
    async fn create_link(
        &self,
        cancel: &CancellationToken,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String>;

    /// Read a deep link's description as pretty-printed JSON.
    async fn get_link(&self, cancel: &CancellationToken, deeplink: &str) -> BranchResult<String>;

    /// Update a deep link and return the provider's answer as pretty-printed JSON.
    async fn update_link(
        &self,
        cancel: &CancellationToken,
        deeplink: &str,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String>;
}

impl BranchClient {
    /// Create a deep link.
    ///
    /// Sends the link properties with the merged metadata and custom data as
    /// its `data` object, plus the access key.
    pub async fn create_link(
        &self,
        cancel: &CancellationToken,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String> {
        let mut body = build_parameters(Some(properties), data, custom_data);
        body.insert(params::BRANCH_KEY.into(), Value::from(self.branch_key()));

        let resp = self.post(cancel, DEEP_LINK_PATH, &body).await?;
        let url = parse_url(&resp)?;
        info!("created deep link {url}");
        Ok(url)
    }

    /// Read an existing deep link.
    pub async fn get_link(&self, cancel: &CancellationToken, deeplink: &str) -> BranchResult<String> {
        let mut query = Map::new();
        query.insert(params::BRANCH_KEY.into(), Value::from(self.branch_key()));
        query.insert(params::URL.into(), Value::from(deeplink));

        let resp = self.get(cancel, DEEP_LINK_PATH, &query).await?;
        pretty_json(&resp)
    }

    /// Update an existing deep link.
    ///
    /// The provider expects the access secret inside the JSON body of this
    /// call, next to the access key.
    pub async fn update_link(
        &self,
        cancel: &CancellationToken,
        deeplink: &str,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String> {
        let mut query = Map::new();
        query.insert(params::URL.into(), Value::from(deeplink));

        let mut body = build_parameters(Some(properties), data, custom_data);
        body.insert(params::BRANCH_KEY.into(), Value::from(self.branch_key()));
        body.insert(params::BRANCH_SECRET.into(), Value::from(self.branch_secret()));

        let resp = self.put(cancel, DEEP_LINK_PATH, &body, &query).await?;
        info!("updated deep link {deeplink}");
        pretty_json(&resp)
    }
}

#[async_trait]
impl DeepLinkApi for BranchClient {
    async fn create_link(
        &self,
        cancel: &CancellationToken,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String> {
        BranchClient::create_link(self, cancel, properties, data, custom_data).await
    }

    async fn get_link(&self, cancel: &CancellationToken, deeplink: &str) -> BranchResult<String> {
        BranchClient::get_link(self, cancel, deeplink).await
    }

    async fn update_link(
        &self,
        cancel: &CancellationToken,
        deeplink: &str,
        properties: &DeepLinkProperties,
        data: &DeepLinkData,
        custom_data: &CustomData,
    ) -> BranchResult<String> {
        BranchClient::update_link(self, cancel, deeplink, properties, data, custom_data).await
    }
}
