//! Link payload types and the parameter builder.
//!
//! A Branch link payload is a flat JSON object of link properties with a
//! nested `data` object. That `data` object is the Open Graph / canonical
//! metadata overlaid with whatever custom keys the caller supplies. Empty
//! fields are left out of the payload entirely.

use serde::Deserialize;
use serde_json::{Map, Value};

use branch_core::constants::data_keys;

/// Caller-supplied key/value pairs stored in a link's `data` object.
pub type CustomData = Map<String, Value>;

/// Link properties sent when creating or updating a deep link.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeepLinkProperties {
    pub channel: String,
    pub feature: String,
    pub stage: String,
    pub campaign: String,
    pub alias: String,
    /// Link type (0 = regular link, 1 = one-time use, 2 = marketing).
    #[serde(rename = "type")]
    pub link_type: i64,
    pub tags: Vec<String>,
    pub identity: String,
    /// Link data. Replaced by the merged metadata and custom data when the
    /// payload is built.
    pub data: CustomData,
}

/// Canonical identifier and Open Graph fields of the linked content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeepLinkData {
    #[serde(rename = "$canonical_identifier")]
    pub canonical_identifier: String,
    #[serde(rename = "$og_title")]
    pub og_title: String,
    #[serde(rename = "$og_description")]
    pub og_description: String,
    #[serde(rename = "$og_image_url")]
    pub og_image_url: String,
    #[serde(rename = "$desktop_url")]
    pub desktop_url: String,
}

impl DeepLinkData {
    /// Key/value view of the non-empty fields, under their `$`-prefixed keys.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        insert_non_empty(&mut map, data_keys::CANONICAL_IDENTIFIER, &self.canonical_identifier);
        insert_non_empty(&mut map, data_keys::OG_TITLE, &self.og_title);
        insert_non_empty(&mut map, data_keys::OG_DESCRIPTION, &self.og_description);
        insert_non_empty(&mut map, data_keys::OG_IMAGE_URL, &self.og_image_url);
        insert_non_empty(&mut map, data_keys::DESKTOP_URL, &self.desktop_url);
        map
    }
}

impl DeepLinkProperties {
    /// Key/value view of the non-empty fields. `data` is always present.
    pub fn to_map(&self) -> Map<String, Value> {
        self.to_map_with_data(self.data.clone())
    }

    fn to_map_with_data(&self, data: CustomData) -> Map<String, Value> {
        let mut map = Map::new();
        insert_non_empty(&mut map, "channel", &self.channel);
        insert_non_empty(&mut map, "feature", &self.feature);
        insert_non_empty(&mut map, "stage", &self.stage);
        insert_non_empty(&mut map, "campaign", &self.campaign);
        insert_non_empty(&mut map, "alias", &self.alias);
        if self.link_type != 0 {
            map.insert("type".into(), Value::from(self.link_type));
        }
        if !self.tags.is_empty() {
            map.insert("tags".into(), Value::from(self.tags.clone()));
        }
        insert_non_empty(&mut map, "identity", &self.identity);
        map.insert("data".into(), Value::Object(data));
        map
    }
}

fn insert_non_empty(map: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), Value::from(value));
    }
}

/// Merge mappings in order; a later mapping overwrites earlier keys.
pub fn merge_maps<'a, I>(maps: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for map in maps {
        for (k, v) in map {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

/// Build the request parameters for a link create/update call.
///
/// The metadata is merged with `custom_data` (custom keys win). Without
/// `properties` that merged mapping is returned as-is; otherwise it becomes
/// the properties' `data` object and the flattened properties are returned.
pub fn build_parameters(
    properties: Option<&DeepLinkProperties>,
    data: &DeepLinkData,
    custom_data: &CustomData,
) -> Map<String, Value> {
    let merged = merge_maps([&data.to_map(), custom_data]);
    match properties {
        Some(properties) => properties.to_map_with_data(merged),
        None => merged,
    }
}
