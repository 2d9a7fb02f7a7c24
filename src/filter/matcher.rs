use super::parser::{FlagClause, FlagFilter, ParsedQuery, SizeValue};
use super::registry::FlagRegistry;
use crate::record::RequestRecord;

/// Check a record against a raw query string.
///
/// The query is parsed fresh on every call. An empty query matches
/// every record, and any other string is a valid query; matching never
/// fails, it only answers yes or no.
pub fn is_freetext_match(record: &RequestRecord, query: &str, registry: &FlagRegistry) -> bool {
    if query.is_empty() {
        return true;
    }
    ParsedQuery::parse(query, registry).matches(record)
}

impl ParsedQuery {
    /// AND-combine every free-text term and every flag clause.
    pub fn matches(&self, record: &RequestRecord) -> bool {
        self.text
            .iter()
            .all(|term| is_text_filter_match(record, term))
            && self.flags.iter().all(|clause| clause.matches(record))
    }
}

/// Case-insensitive substring match of a free-text term against the
/// record URL. A term starting with `-` and longer than the `-` itself
/// inverts the containment check; an empty term matches trivially.
pub fn is_text_filter_match(record: &RequestRecord, term: &str) -> bool {
    let url = record.url.to_lowercase();
    if let Some(rest) = term.strip_prefix('-') {
        if !rest.is_empty() {
            return !url.contains(&rest.to_lowercase());
        }
    }
    term.is_empty() || url.contains(&term.to_lowercase())
}

impl FlagClause {
    /// Evaluate the clause against a record. The branch result is
    /// computed first and `negative` inverts it afterwards, so the
    /// always-match fallbacks are invertible too.
    pub fn matches(&self, record: &RequestRecord) -> bool {
        let matched = match &self.filter {
            FlagFilter::StatusCode(value) => record.status.as_deref() == Some(value.as_str()),
            FlagFilter::Method(value) => record.method.to_lowercase() == *value,
            FlagFilter::Domain(value) => record.url_details.host.to_lowercase().contains(value),
            FlagFilter::RemoteIp(value) => {
                format!("{}:{}", record.remote_address, record.remote_port)
                    .to_lowercase()
                    .contains(value)
            }
            FlagFilter::Cause(value) => record
                .cause
                .kind
                .as_deref()
                .is_some_and(|kind| kind.to_lowercase().contains(value)),
            FlagFilter::Transferred(value) => {
                !record.from_cache && buckets_match(value, record.transferred_size)
            }
            FlagFilter::Size(value) => buckets_match(value, record.content_size),
            FlagFilter::LargerThan(value) => value
                .as_bytes()
                .is_some_and(|bytes| record.content_size > bytes),
            FlagFilter::MimeType(value) => record.mime_type.contains(value),
            FlagFilter::Is(value) => match value.as_str() {
                "from-cache" | "cached" => {
                    record.from_cache || record.status.as_deref() == Some("304")
                }
                "running" => record.is_pending(),
                // Unrecognized `is:` values do not exclude anything.
                _ => true,
            },
            FlagFilter::Scheme(value) => {
                url_scheme(&record.url).is_some_and(|scheme| scheme.to_lowercase() == *value)
            }
            // Header-derived keys only filter when the record carries
            // the header; without it they match everything.
            FlagFilter::Header { key, value } => match header_value(record, key) {
                Some(header) => header.to_lowercase().contains(value),
                None => true,
            },
        };

        if self.negative { !matched } else { matched }
    }
}

/// Bucket a byte count by the rounded base-10 logarithm, so 950 and
/// 1100 land in the same bucket as 1024. Non-positive and non-finite
/// sizes have no bucket.
pub fn size_bucket(size: f64) -> Option<i64> {
    if size <= 0.0 || !size.is_finite() {
        return None;
    }
    Some(size.log10().round() as i64)
}

fn buckets_match(value: &SizeValue, actual: f64) -> bool {
    match value.as_bytes().and_then(size_bucket) {
        Some(bucket) => size_bucket(actual) == Some(bucket),
        None => false,
    }
}

/// The URL scheme, i.e. everything before the `://` separator.
fn url_scheme(url: &str) -> Option<&str> {
    url.split_once("://").map(|(scheme, _)| scheme)
}

fn header_value<'a>(record: &'a RequestRecord, key: &str) -> Option<&'a str> {
    record
        .response_headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.as_str())
}
