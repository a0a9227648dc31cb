//! Escape-worthiness classification for raw URL-ish strings.
//!
//! Used by the parser to recognise inputs that carry encoded or injected
//! payloads (e.g. `%0a`, spaces, angle brackets) and must therefore be kept
//! verbatim instead of being handed to the delegate syntax parser.

/// Characters accepted verbatim in a path-ish token: the RFC 3986 `pchar`
/// alphabet (unreserved + sub-delims + `:` and `@`).
///
/// `%` is deliberately absent so that percent-encoded payloads register as
/// escape-worthy. `/` is not listed either; [`should_escape`] always accepts
/// it as the path separator.
pub const DEFAULT_SAFE_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~!$&'()*+,;=:@";

/// Returns true if `s` contains any character outside [`DEFAULT_SAFE_CHARSET`].
///
/// `/` is always accepted; any character above U+007F is always escape-worthy.
pub fn should_escape(s: &str) -> bool {
    should_escape_with(s, DEFAULT_SAFE_CHARSET)
}

/// [`should_escape`] with a caller-supplied safe character set.
pub fn should_escape_with(s: &str, safe: &str) -> bool {
    s.chars().any(|c| match c {
        '/' => false,
        c if (c as u32) > 127 => true,
        c => !safe.contains(c),
    })
}
