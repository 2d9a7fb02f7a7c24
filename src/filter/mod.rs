//! Free-text query parsing and request-record matching
//!
//! A query is a whitespace-separated list of free-text terms and
//! `key:value` flag clauses. All terms and clauses combine with AND;
//! there is no invalid query, anything unrecognized degrades to a
//! literal URL substring search.
//!
//! # Syntax
//!
//! ```text
//! term                  URL contains "term" (case-insensitive)
//! -term                 URL does not contain "term"
//! key:value             record matches the typed clause
//! -key:value            record does not match the typed clause
//! ```
//!
//! # Flag keys
//!
//! Built-in: `status-code`, `method`, `domain`, `remote-ip`, `cause`,
//! `transferred`, `size`, `larger-than`, `mime-type`, `is`, `scheme`.
//! Further keys can be contributed by host-supplied header columns,
//! see [`registry::FlagRegistry`].
//!
//! # Examples
//!
//! ```text
//! method:GET                       GET requests only
//! -status-code:404                 everything that did not 404
//! size:1k                          responses around one kilobyte
//! larger-than:500k is:from-cache   big cached responses
//! scheme:https api -tracker        HTTPS URLs containing "api" but not "tracker"
//! ```

pub mod matcher;
pub mod parser;
pub mod registry;

pub use matcher::{is_freetext_match, is_text_filter_match, size_bucket};
pub use parser::{FlagClause, FlagFilter, ParsedQuery, SizeValue};
pub use registry::{FlagRegistry, HeaderDescriptor, default_headers};
