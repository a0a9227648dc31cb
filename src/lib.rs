//! Lenient URL parsing, normalization and merging for network reconnaissance
//! tooling.
//!
//! Accepts ambiguous, partially-qualified, or intentionally malformed URL-like
//! strings (bare hostnames, relative paths, percent-encoded fuzzing payloads)
//! and produces a structured, round-trippable [`Url`]. Paths are never
//! normalized: `..` segments and percent-encoded control sequences survive
//! exactly as given, because downstream scanners depend on them.

pub mod error;
pub mod escape;
pub mod merge;
pub mod params;
pub mod parser;
pub mod url_model;

pub use error::ParseError;
pub use escape::{should_escape, should_escape_with, DEFAULT_SAFE_CHARSET};
pub use merge::{auto_merge_rel_paths, merge_paths};
pub use params::Params;
pub use parser::{parse, parse_url, parse_with, ParseOptions};
pub use url_model::{Url, UserInfo};
