use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;

/// A single network request entry as captured in a request log.
///
/// Records are read-only inputs to the filter engine; matching never
/// mutates them. Every field defaults so partial records (e.g. a
/// request that is still in flight) deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestRecord {
    pub url: String,
    pub method: String,
    /// HTTP status as a string (e.g. "200"). Absent or empty while the
    /// request is in flight. JSON input may use a string or a number.
    #[serde(
        deserialize_with = "status_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    pub url_details: UrlDetails,
    pub remote_address: String,
    pub remote_port: u16,
    pub cause: RequestCause,
    pub from_cache: bool,
    pub content_size: f64,
    pub transferred_size: f64,
    pub mime_type: String,
    /// Response headers by name. Backs header-derived filter keys.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub response_headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
}

impl RequestRecord {
    /// A request with no status yet is still in flight.
    pub fn is_pending(&self) -> bool {
        self.status.as_deref().unwrap_or("").is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlDetails {
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestCause {
    /// What triggered the request ("document", "xhr", "img", ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn status_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(status)) => Ok(Some(status)),
        Some(serde_json::Value::Number(status)) => Ok(Some(status.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "invalid status value: {}",
            other
        ))),
    }
}
