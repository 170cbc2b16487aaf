//! Branch API - HTTP client for the Branch deep-link REST API.
//!
//! This crate creates, reads, and updates Branch deep links. Typed link
//! properties and Open Graph metadata are flattened together with caller
//! supplied custom data into the JSON payload the provider expects, sent over
//! a shared connection pool, and the responses are handed back as plain
//! strings (the short URL, or pretty-printed JSON).

pub mod client;
pub mod endpoints;
pub mod params;
pub mod response;

// Re-export key types
pub use client::BranchClient;
pub use endpoints::links::DeepLinkApi;
pub use params::{build_parameters, merge_maps, CustomData, DeepLinkData, DeepLinkProperties};
pub use response::{ErrorBody, UrlResponse};
pub use tokio_util::sync::CancellationToken;
