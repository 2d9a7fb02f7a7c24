use super::registry::FlagRegistry;
use std::fmt;

/// A byte quantity parsed from a query value.
///
/// Malformed input is kept as an explicit `Invalid` variant: the clause
/// survives parsing but can never match a record.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    Bytes(f64),
    Invalid,
}

impl SizeValue {
    /// Parse a size value, honoring a trailing lowercase `k` (×1024) or
    /// `m` (×1024²) unit suffix. No suffix means plain bytes.
    pub fn parse(raw: &str) -> Self {
        let (number, multiplier) = if let Some(stripped) = raw.strip_suffix('k') {
            (stripped, 1024.0)
        } else if let Some(stripped) = raw.strip_suffix('m') {
            (stripped, 1024.0 * 1024.0)
        } else {
            (raw, 1.0)
        };

        match number.parse::<f64>() {
            Ok(quantity) => SizeValue::Bytes(quantity * multiplier),
            Err(_) => SizeValue::Invalid,
        }
    }

    pub fn as_bytes(&self) -> Option<f64> {
        match self {
            SizeValue::Bytes(bytes) => Some(*bytes),
            SizeValue::Invalid => None,
        }
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Bytes(bytes) => write!(f, "{}", bytes),
            SizeValue::Invalid => f.write_str("<invalid>"),
        }
    }
}

/// One typed `key:value` filter, tagged by flag key.
///
/// Keys with dedicated matching logic get their own variant; keys that
/// only exist because a header column contributed them are collected
/// under `Header`.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagFilter {
    StatusCode(String),
    Method(String),
    Domain(String),
    RemoteIp(String),
    Cause(String),
    Transferred(SizeValue),
    Size(SizeValue),
    LargerThan(SizeValue),
    MimeType(String),
    Is(String),
    Scheme(String),
    Header { key: String, value: String },
}

impl FlagFilter {
    /// Build the typed filter for a registry key. Size-like keys parse
    /// their value as a byte quantity; every other value is lowercased
    /// for case-insensitive matching downstream.
    fn for_key(key: &str, raw: &str) -> Self {
        match key {
            "status-code" => FlagFilter::StatusCode(raw.to_lowercase()),
            "method" => FlagFilter::Method(raw.to_lowercase()),
            "domain" => FlagFilter::Domain(raw.to_lowercase()),
            "remote-ip" => FlagFilter::RemoteIp(raw.to_lowercase()),
            "cause" => FlagFilter::Cause(raw.to_lowercase()),
            "transferred" => FlagFilter::Transferred(SizeValue::parse(raw)),
            "size" => FlagFilter::Size(SizeValue::parse(raw)),
            "larger-than" => FlagFilter::LargerThan(SizeValue::parse(raw)),
            "mime-type" => FlagFilter::MimeType(raw.to_lowercase()),
            "is" => FlagFilter::Is(raw.to_lowercase()),
            "scheme" => FlagFilter::Scheme(raw.to_lowercase()),
            _ => FlagFilter::Header {
                key: key.to_string(),
                value: raw.to_lowercase(),
            },
        }
    }

    /// The query-syntax key this filter was parsed from.
    pub fn key(&self) -> &str {
        match self {
            FlagFilter::StatusCode(_) => "status-code",
            FlagFilter::Method(_) => "method",
            FlagFilter::Domain(_) => "domain",
            FlagFilter::RemoteIp(_) => "remote-ip",
            FlagFilter::Cause(_) => "cause",
            FlagFilter::Transferred(_) => "transferred",
            FlagFilter::Size(_) => "size",
            FlagFilter::LargerThan(_) => "larger-than",
            FlagFilter::MimeType(_) => "mime-type",
            FlagFilter::Is(_) => "is",
            FlagFilter::Scheme(_) => "scheme",
            FlagFilter::Header { key, .. } => key,
        }
    }
}

/// A single flag clause: a typed filter plus its negation marker.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagClause {
    pub filter: FlagFilter,
    pub negative: bool,
}

impl fmt::Display for FlagClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}:", self.filter.key())?;
        match &self.filter {
            FlagFilter::Transferred(value)
            | FlagFilter::Size(value)
            | FlagFilter::LargerThan(value) => write!(f, "{}", value),
            FlagFilter::StatusCode(value)
            | FlagFilter::Method(value)
            | FlagFilter::Domain(value)
            | FlagFilter::RemoteIp(value)
            | FlagFilter::Cause(value)
            | FlagFilter::MimeType(value)
            | FlagFilter::Is(value)
            | FlagFilter::Scheme(value)
            | FlagFilter::Header { value, .. } => f.write_str(value),
        }
    }
}

/// A raw query string broken into free-text terms and flag clauses.
///
/// Both vectors preserve input order and keep duplicates; matching
/// AND-combines everything, so order never changes the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub text: Vec<String>,
    pub flags: Vec<FlagClause>,
}

impl ParsedQuery {
    /// Parse a free-text query against the given flag registry.
    ///
    /// Any input is a valid query. Tokens are split on whitespace runs;
    /// a token with a recognized `key:value` shape becomes a flag
    /// clause (a leading `-` on the key negates it), everything else is
    /// a literal free-text term. An unrecognized key keeps the whole
    /// original token, `-` and `:` included, as free text.
    pub fn parse(query: &str, registry: &FlagRegistry) -> Self {
        let mut parsed = ParsedQuery::default();

        for part in query.split_whitespace() {
            let Some((raw_key, value)) = part.split_once(':') else {
                parsed.text.push(part.to_string());
                continue;
            };

            let (negative, key) = match raw_key.strip_prefix('-') {
                Some(stripped) => (true, stripped),
                None => (false, raw_key),
            };

            if !registry.contains(key) {
                parsed.text.push(part.to_string());
                continue;
            }

            parsed.flags.push(FlagClause {
                filter: FlagFilter::for_key(key, value),
                negative,
            });
        }

        parsed
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::registry::HeaderDescriptor;
    use super::*;

    fn registry() -> FlagRegistry {
        FlagRegistry::default()
    }

    #[test]
    fn test_parse_free_text_terms() {
        let parsed = ParsedQuery::parse("foo bar", &registry());
        assert_eq!(parsed.text, vec!["foo", "bar"]);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_parse_flag_clause() {
        let parsed = ParsedQuery::parse("method:GET", &registry());
        assert!(parsed.text.is_empty());
        assert_eq!(parsed.flags.len(), 1);
        assert_eq!(
            parsed.flags[0],
            FlagClause {
                filter: FlagFilter::Method("get".to_string()),
                negative: false,
            }
        );
    }

    #[test]
    fn test_parse_negated_clause() {
        let parsed = ParsedQuery::parse("-status-code:200", &registry());
        assert_eq!(parsed.flags.len(), 1);
        assert!(parsed.flags[0].negative);
        assert_eq!(
            parsed.flags[0].filter,
            FlagFilter::StatusCode("200".to_string())
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_text() {
        let parsed = ParsedQuery::parse("bogus:xyz", &registry());
        assert_eq!(parsed.text, vec!["bogus:xyz"]);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_unknown_negated_key_keeps_dash_in_text() {
        let parsed = ParsedQuery::parse("-bogus:xyz", &registry());
        assert_eq!(parsed.text, vec!["-bogus:xyz"]);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_key_lookup_is_case_sensitive() {
        let parsed = ParsedQuery::parse("METHOD:GET", &registry());
        assert_eq!(parsed.text, vec!["METHOD:GET"]);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_value_may_contain_colons() {
        let parsed = ParsedQuery::parse("domain:localhost:8080", &registry());
        assert_eq!(
            parsed.flags[0].filter,
            FlagFilter::Domain("localhost:8080".to_string())
        );
    }

    #[test]
    fn test_whitespace_runs_are_collapsed() {
        let parsed = ParsedQuery::parse("  foo   method:GET \t bar ", &registry());
        assert_eq!(parsed.text, vec!["foo", "bar"]);
        assert_eq!(parsed.flags.len(), 1);
    }

    #[test]
    fn test_order_is_preserved_without_dedup() {
        let parsed = ParsedQuery::parse("b a a method:GET method:POST", &registry());
        assert_eq!(parsed.text, vec!["b", "a", "a"]);
        assert_eq!(parsed.flags[0].filter, FlagFilter::Method("get".into()));
        assert_eq!(parsed.flags[1].filter, FlagFilter::Method("post".into()));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let registry = registry();
        let query = "method:GET -status-code:200 size:2k foo -bar bogus:x";
        assert_eq!(
            ParsedQuery::parse(query, &registry),
            ParsedQuery::parse(query, &registry)
        );
    }

    #[test]
    fn test_size_suffix_parsing() {
        assert_eq!(SizeValue::parse("2k"), SizeValue::Bytes(2048.0));
        assert_eq!(SizeValue::parse("1m"), SizeValue::Bytes(1_048_576.0));
        assert_eq!(SizeValue::parse("100"), SizeValue::Bytes(100.0));
        assert_eq!(SizeValue::parse("1.5k"), SizeValue::Bytes(1536.0));
        assert_eq!(SizeValue::parse("abc"), SizeValue::Invalid);
        assert_eq!(SizeValue::parse(""), SizeValue::Invalid);
    }

    #[test]
    fn test_size_suffix_is_lowercase_only() {
        assert_eq!(SizeValue::parse("2K"), SizeValue::Invalid);
        assert_eq!(SizeValue::parse("1M"), SizeValue::Invalid);
    }

    #[test]
    fn test_invalid_size_clause_is_retained() {
        let parsed = ParsedQuery::parse("size:abc", &registry());
        assert_eq!(parsed.flags[0].filter, FlagFilter::Size(SizeValue::Invalid));
    }

    #[test]
    fn test_header_derived_key_parses_as_header_clause() {
        let headers = vec![HeaderDescriptor::new("set-cookie-domain", true)];
        let registry = FlagRegistry::from_headers(&headers);
        let parsed = ParsedQuery::parse("set-cookie-domain:Example.COM", &registry);
        assert_eq!(
            parsed.flags[0].filter,
            FlagFilter::Header {
                key: "set-cookie-domain".to_string(),
                value: "example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_clause_display_shows_normalized_value() {
        // Display renders the parsed clause, not the original token:
        // values are lowercased and size suffixes expand to bytes.
        let parsed = ParsedQuery::parse("-method:GET size:2k", &registry());
        assert_eq!(parsed.flags[0].to_string(), "-method:get");
        assert_eq!(parsed.flags[1].to_string(), "size:2048");
    }
}
