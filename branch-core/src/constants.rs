//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "BranchLinks";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Production base URL of the Branch REST API.
pub const DEFAULT_API_URL: &str = "https://api2.branch.io/v1";

/// Path segment of the deep-link resource, relative to the API base URL.
pub const DEEP_LINK_PATH: &str = "url";

/// Request parameter names understood by the deep-link endpoint.
pub mod params {
    /// Access key, sent with every call.
    pub const BRANCH_KEY: &str = "branch_key";
    /// Access secret, sent with update calls only.
    pub const BRANCH_SECRET: &str = "branch_secret";
    /// The deep link being read or updated.
    pub const URL: &str = "url";
}

/// Keys of the link content metadata inside a link's `data` mapping.
pub mod data_keys {
    pub const CANONICAL_IDENTIFIER: &str = "$canonical_identifier";
    pub const OG_TITLE: &str = "$og_title";
    pub const OG_DESCRIPTION: &str = "$og_description";
    pub const OG_IMAGE_URL: &str = "$og_image_url";
    pub const DESKTOP_URL: &str = "$desktop_url";
}
