//! Parse error taxonomy.

use thiserror::Error;

/// Errors returned by [`parse_with`](crate::parser::parse_with) and friends.
///
/// Unsafe mode downgrades what would otherwise be `InvalidUrl` failures into
/// best-effort raw-string assignment; the other variants are returned
/// regardless of mode.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Nothing left to parse after fragment and query stripping.
    #[error("failed to parse url: got empty input")]
    EmptyInput,

    /// The delegate syntax parser rejected the input in safe mode.
    #[error("failed to parse url `{input}`")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// The input was classified as absolute but no host was found.
    #[error("failed to parse url `{0}`: got empty host when url is not relative")]
    EmptyHost(String),
}
