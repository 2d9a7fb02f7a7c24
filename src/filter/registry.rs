use std::collections::BTreeSet;

/// Flag keys that are always recognized, independent of the header
/// columns supplied by the host.
const FIXED_FLAGS: [&str; 4] = ["scheme", "mime-type", "larger-than", "is"];

/// Metadata for one request-list column as supplied by the host
/// application. Only columns with `can_filter` contribute a flag key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescriptor {
    /// Column name.
    pub name: String,
    /// Whether the column participates in query filtering.
    pub can_filter: bool,
    /// Alternate key exposed in query syntax instead of `name`.
    pub filter_key: Option<String>,
}

impl HeaderDescriptor {
    pub fn new(name: impl Into<String>, can_filter: bool) -> Self {
        Self {
            name: name.into(),
            can_filter,
            filter_key: None,
        }
    }

    pub fn with_filter_key(mut self, key: impl Into<String>) -> Self {
        self.filter_key = Some(key.into());
        self
    }
}

/// The set of flag keys the parser recognizes.
///
/// Built once at startup from the header descriptor list and passed by
/// reference into parsing afterwards; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRegistry {
    keys: BTreeSet<String>,
}

impl FlagRegistry {
    /// Build a registry from header metadata. Descriptors with
    /// `can_filter` contribute `filter_key` when present, `name`
    /// otherwise. The fixed keys are always included.
    pub fn from_headers(headers: &[HeaderDescriptor]) -> Self {
        let mut keys: BTreeSet<String> = headers
            .iter()
            .filter(|header| header.can_filter)
            .map(|header| {
                header
                    .filter_key
                    .clone()
                    .unwrap_or_else(|| header.name.clone())
            })
            .collect();
        keys.extend(FIXED_FLAGS.iter().map(|key| key.to_string()));
        Self { keys }
    }

    /// Case-sensitive exact-match lookup.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// All recognized keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for FlagRegistry {
    /// Registry for the default request-list columns.
    fn default() -> Self {
        Self::from_headers(&default_headers())
    }
}

/// The default request-list columns. Not every column is filterable,
/// and two columns filter under an alternate key: the status column as
/// `status-code`, the content size column as `size`.
pub fn default_headers() -> Vec<HeaderDescriptor> {
    vec![
        HeaderDescriptor::new("status", true).with_filter_key("status-code"),
        HeaderDescriptor::new("method", true),
        HeaderDescriptor::new("file", false),
        HeaderDescriptor::new("domain", true),
        HeaderDescriptor::new("remote-ip", true),
        HeaderDescriptor::new("cause", true),
        HeaderDescriptor::new("type", false),
        HeaderDescriptor::new("cookies", false),
        HeaderDescriptor::new("transferred", true),
        HeaderDescriptor::new("contentSize", true).with_filter_key("size"),
        HeaderDescriptor::new("waterfall", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_builtin_keys() {
        let registry = FlagRegistry::default();
        for key in [
            "status-code",
            "method",
            "domain",
            "remote-ip",
            "cause",
            "transferred",
            "size",
            "scheme",
            "mime-type",
            "larger-than",
            "is",
        ] {
            assert!(registry.contains(key), "missing key: {}", key);
        }
    }

    #[test]
    fn test_non_filterable_columns_are_excluded() {
        let registry = FlagRegistry::default();
        assert!(!registry.contains("file"));
        assert!(!registry.contains("cookies"));
        assert!(!registry.contains("waterfall"));
    }

    #[test]
    fn test_filter_key_replaces_column_name() {
        let registry = FlagRegistry::default();
        assert!(registry.contains("status-code"));
        assert!(!registry.contains("status"));
        assert!(registry.contains("size"));
        assert!(!registry.contains("contentSize"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = FlagRegistry::default();
        assert!(!registry.contains("Method"));
        assert!(!registry.contains("STATUS-CODE"));
    }

    #[test]
    fn test_fixed_flags_survive_empty_header_list() {
        let registry = FlagRegistry::from_headers(&[]);
        assert_eq!(registry.len(), 4);
        assert!(registry.contains("scheme"));
        assert!(registry.contains("is"));
        assert!(!registry.contains("method"));
    }

    #[test]
    fn test_custom_header_contributes_key() {
        let headers = vec![
            HeaderDescriptor::new("set-cookie-domain", true),
            HeaderDescriptor::new("protocol", false),
        ];
        let registry = FlagRegistry::from_headers(&headers);
        assert!(registry.contains("set-cookie-domain"));
        assert!(!registry.contains("protocol"));
    }
}
