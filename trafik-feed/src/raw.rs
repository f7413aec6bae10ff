//! Wire shapes of the upstream bulletin feed.
//!
//! These mirror the JSON exactly and are converted to the canonical model
//! in [`crate::normalize`]; nothing outside this crate sees them.

use serde::Deserialize;

/// Upstream traffic post (subset).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTrafficPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub region: String,
    #[serde(rename = "type")]
    pub transport_type: String,
    pub text: String,
    pub created_time: String,
    pub updated_time: String,
    #[serde(default)]
    pub concluded: Option<bool>,
    #[serde(default)]
    pub updates: Vec<RawPostUpdate>,
    #[serde(default)]
    pub reference: Option<RawPostReference>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPostUpdate {
    pub created_time: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPostReference {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
}

/// Upstream important notice (subset).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawImportantNotice {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub created_time: String,
    pub updated_time: String,
}
