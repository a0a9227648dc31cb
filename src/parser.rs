//! Lenient URL parser.
//!
//! Accepts bare hostnames, relative paths, and intentionally malformed
//! URL-like strings. Fragment and query are extracted eagerly, the remainder
//! is classified as relative-path, absolute-URL, or ambiguous bare token, and
//! absolute syntax is delegated to the `url` crate. A final re-derivation pass
//! keeps the path byte-for-byte as given, because the delegate rewrites
//! percent-encodings and dot segments that scanning payloads depend on.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::escape::should_escape;
use crate::url_model::{Url, UserInfo};

/// Base used to resolve inputs the delegate refuses to parse on their own
/// (scheme-relative and bare relative references). Only the path of the
/// resolved result is ever consulted for relative inputs.
const THROWAWAY_BASE: &str = "https://throwaway.invalid/";

/// Parser behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Accept malformed input as a raw relative path instead of failing.
    pub unsafe_parse: bool,
    /// Reclassify an absolute parse as relative when its host looks like a
    /// bare word rather than a domain, IPv4, or IPv6 literal (e.g. `admin`
    /// parsed through a synthetic `https://` prefix).
    pub autocorrect: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            unsafe_parse: false,
            autocorrect: true,
        }
    }
}

/// Parses `input` with safe defaults (strict, autocorrection on).
pub fn parse(input: &str) -> Result<Url, ParseError> {
    parse_with(input, ParseOptions::default())
}

/// Parses `input`, optionally accepting malformed paths verbatim.
pub fn parse_url(input: &str, unsafe_parse: bool) -> Result<Url, ParseError> {
    parse_with(
        input,
        ParseOptions {
            unsafe_parse,
            ..ParseOptions::default()
        },
    )
}

/// Parses `input` under explicit [`ParseOptions`].
///
/// Classification order matters and each step narrows `original`:
/// fragment, then query, are stripped before anything else; a `/`-prefixed
/// input short-circuits as relative; scheme-bearing input goes to the
/// delegate; anything else is retried with a synthetic `https://` prefix and
/// autocorrected back to relative when the resulting host does not look like
/// a real one. The path is then re-derived from the original string so that
/// percent-encoded payloads survive untouched.
pub fn parse_with(input: &str, opts: ParseOptions) -> Result<Url, ParseError> {
    let mut u = Url::with_original(input, opts.unsafe_parse);
    extract_fragment_and_query(&mut u);

    let original = u.original.clone();
    if original.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    // Definitely a relative path.
    if original.starts_with('/') && !original.starts_with("//") {
        u.is_relative = true;
        u.path = original;
        return Ok(u);
    }

    if original.starts_with("//") {
        // Scheme-relative. The delegate rejects these without a base; the
        // base contributes nothing but the scheme, which is not kept.
        u.is_relative = false;
        let parsed = resolve_against_base(&original)
            .map_err(|source| ParseError::InvalidUrl {
                input: original.clone(),
                source,
            })?;
        copy_delegate_fields(&mut u, &parsed, true);
    } else if original.starts_with("http") || original.contains("://") {
        u.is_relative = false;
        let parsed = url::Url::parse(&original).map_err(|source| ParseError::InvalidUrl {
            input: original.clone(),
            source,
        })?;
        copy_delegate_fields(&mut u, &parsed, false);
    } else {
        // Ambiguous bare token: try it as a host with a synthetic scheme.
        match url::Url::parse(&format!("https://{original}")) {
            Ok(parsed) => copy_delegate_fields(&mut u, &parsed, true),
            Err(_) => u.is_relative = true,
        }
    }

    if u.is_relative {
        // Give the delegate one shot at the original, unmodified string.
        match resolve_against_base(&original) {
            Ok(parsed) => {
                if parsed.cannot_be_a_base() {
                    // e.g. `mailto:user@host` reached through the bare-token
                    // branch: an opaque URL, not a path.
                    u.scheme = parsed.scheme().to_string();
                    u.opaque = parsed.path().to_string();
                } else {
                    u.path = parsed.path().to_string();
                    u.raw_path.clone_from(&u.path);
                }
            }
            Err(source) => {
                if !opts.unsafe_parse {
                    return Err(ParseError::InvalidUrl {
                        input: original.clone(),
                        source,
                    });
                }
                // Unsafe mode: the delegate's opinion is discarded entirely.
                u.path.clone_from(&original);
            }
        }
    } else {
        if u.host.is_empty() {
            return Err(ParseError::EmptyHost(original));
        }
        if opts.autocorrect && !u.host.contains('.') && !u.host.contains(':') {
            // Does not look like a domain, IPv4, or IPv6 literal; a bare word
            // was mistaken for a host by the synthetic-scheme retry.
            u.is_relative = true;
            u.path.clone_from(&original);
            u.host.clear();
        }
    }

    if !u.is_relative && u.host.is_empty() {
        return Err(ParseError::EmptyHost(original));
    }

    parse_relative_path(&mut u);
    Ok(u)
}

/// Steps 1–2: strip the fragment, then the query, out of `original` and into
/// the value object, before any host/path classification sees the string.
fn extract_fragment_and_query(u: &mut Url) {
    if let Some(i) = u.original.find('#') {
        u.fragment = u.original[i + 1..].to_string();
        u.original.truncate(i);
    }
    if let Some(i) = u.original.find('?') {
        let raw = u.original[i + 1..].to_string();
        u.params.decode(&raw);
        u.original.truncate(i);
        u.resync();
    }
}

fn resolve_against_base(s: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse(THROWAWAY_BASE)?.join(s)
}

/// Copies the syntactic fields the parser trusts from a delegate result.
/// Fragment and query are never copied; they were extracted up front.
fn copy_delegate_fields(u: &mut Url, parsed: &url::Url, strip_scheme: bool) {
    if !strip_scheme {
        u.scheme = parsed.scheme().to_string();
    }
    // Host::Display brackets IPv6 literals, matching how they appear in the
    // input string.
    u.host = match (parsed.host(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    if parsed.cannot_be_a_base() {
        u.opaque = parsed.path().to_string();
    } else {
        u.path = parsed.path().to_string();
        u.raw_path.clone_from(&u.path);
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        u.user = Some(UserInfo {
            username: parsed.username().to_string(),
            password: parsed.password().map(str::to_string),
        });
    }
}

/// Step 10: re-derive the path from `original` instead of trusting the
/// delegate, which silently rewrites percent-encoded control sequences
/// (e.g. `%0a`) and dot segments that fuzzing payloads rely on.
fn parse_relative_path(u: &mut Url) {
    if u.host.is_empty() || u.host.len() < 4 {
        if should_escape(&u.original) {
            u.is_relative = true;
            u.path.clone_from(&u.original);
            u.host.clear();
        }
        return;
    }
    let Some(start) = u.original.find(u.host.as_str()) else {
        // Internal inconsistency: the computed host is not in the input.
        // Recoverable; keep whatever path is already set.
        tracing::warn!(
            original = %u.original,
            host = %u.host,
            "failed to extract path from input url, falling back to defaults"
        );
        return;
    };
    let tail = &u.original[start + u.host.len()..];

    // A scheme-default port the delegate normalized away shows up here as a
    // leading `:NNN`; fold it back into the host. Checking for an existing
    // port (not just any colon) keeps bracketed IPv6 hosts eligible.
    let mut port_len = 0;
    if u.port().is_none() && tail.starts_with(':') {
        let digits = tail[1..].bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            port_len = 1 + digits;
        }
    }
    let path = tail[port_len..].to_string();
    if port_len > 0 {
        let port = tail[..port_len].to_string();
        u.host.push_str(&port);
    }
    u.path = path;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_prefix_is_relative_fast_path() {
        let u = parse("/admin/login").unwrap();
        assert!(u.is_relative);
        assert_eq!(u.path, "/admin/login");
        assert_eq!(u.host, "");
    }

    #[test]
    fn fragment_then_query_extraction_order() {
        let u = parse("/path?a=1#frag").unwrap();
        assert_eq!(u.path, "/path");
        assert_eq!(u.params.get("a"), Some(&["1".to_string()][..]));
        assert_eq!(u.fragment, "frag");
        assert_eq!(u.raw_query, "a=1");
        assert!(!u.original.contains('#'));
        assert!(!u.original.contains('?'));
    }

    #[test]
    fn query_inside_fragment_stays_in_fragment() {
        let u = parse("/path#frag?notaquery=1").unwrap();
        assert_eq!(u.fragment, "frag?notaquery=1");
        assert!(u.params.is_empty());
        assert_eq!(u.path, "/path");
    }

    #[test]
    fn empty_input_after_stripping_fails() {
        assert!(matches!(parse(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("?a=1"), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("#frag"), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn absolute_url_keeps_scheme_and_host() {
        let u = parse("https://example.com/a/b").unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.scheme, "https");
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/a/b");
    }

    #[test]
    fn absolute_url_with_port_and_userinfo() {
        let u = parse("https://bob:pw@example.com:8443/x").unwrap();
        assert_eq!(u.host, "example.com:8443");
        assert_eq!(u.path, "/x");
        let user = u.user.as_ref().unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.password.as_deref(), Some("pw"));
    }

    #[test]
    fn scheme_relative_input() {
        let u = parse("//example.com/x").unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.scheme, "");
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/x");
    }

    #[test]
    fn bare_domain_is_absolute_without_scheme() {
        let u = parse("example.com/login").unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.scheme, "");
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/login");
    }

    #[test]
    fn bare_host_with_port_is_absolute() {
        let u = parse("localhost:8080/debug").unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.host, "localhost:8080");
        assert_eq!(u.path, "/debug");
    }

    #[test]
    fn autocorrect_reclassifies_bare_word() {
        let u = parse("admin").unwrap();
        assert!(u.is_relative);
        assert_eq!(u.path, "admin");
        assert_eq!(u.host, "");
    }

    #[test]
    fn autocorrect_disabled_keeps_bare_word_as_host() {
        let opts = ParseOptions {
            autocorrect: false,
            ..ParseOptions::default()
        };
        let u = parse_with("admin", opts).unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.host, "admin");
        assert_eq!(u.path, "");
    }

    #[test]
    fn autocorrect_applies_to_explicit_scheme_too() {
        let u = parse("http://example").unwrap();
        assert!(u.is_relative);
        assert_eq!(u.path, "http://example");
        assert_eq!(u.host, "");
    }

    #[test]
    fn dotted_and_colon_hosts_survive_autocorrect() {
        assert!(!parse("10.0.0.1/admin").unwrap().is_relative);
        assert!(!parse("https://[::1]:8080/x").unwrap().is_relative);
    }

    #[test]
    fn ipv6_host_with_port() {
        let u = parse("https://[::1]:8080/x").unwrap();
        assert_eq!(u.host, "[::1]:8080");
        assert_eq!(u.path, "/x");
    }

    #[test]
    fn invalid_absolute_url_fails_in_safe_mode() {
        let err = parse("https://exa mple.com/x").unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }));
    }

    #[test]
    fn empty_host_fails_when_absolute() {
        let err = parse("file:///etc/passwd").unwrap_err();
        assert!(matches!(err, ParseError::EmptyHost(_)));
    }

    #[test]
    fn percent_encoded_payload_kept_verbatim() {
        let u = parse("/%20test%0a").unwrap();
        assert!(u.is_relative);
        assert_eq!(u.path, "/%20test%0a");
    }

    #[test]
    fn percent_encoded_bare_token_forced_relative() {
        // synthetic-scheme retry would otherwise sanitize the encoding
        let u = parse_url("%2e%2e/%2e%2e/etc", true).unwrap();
        assert!(u.is_relative);
        assert_eq!(u.path, "%2e%2e/%2e%2e/etc");
        assert_eq!(u.host, "");
    }

    #[test]
    fn absolute_path_not_sanitized_by_delegate() {
        // the delegate would resolve the dot segments; the re-derivation pass
        // restores the path exactly as given
        let u = parse("https://example.com/a/../b/%0a").unwrap();
        assert_eq!(u.path, "/a/../b/%0a");
    }

    #[test]
    fn explicit_default_port_folds_back_into_host() {
        let u = parse("https://example.com:443/x").unwrap();
        assert_eq!(u.host, "example.com:443");
        assert_eq!(u.path, "/x");
    }

    #[test]
    fn ipv6_explicit_default_port_folds_back_into_host() {
        let u = parse("https://[::1]:443/x").unwrap();
        assert_eq!(u.host, "[::1]:443");
        assert_eq!(u.path, "/x");
        assert_eq!(u.to_string(), "https://[::1]:443/x");
    }

    #[test]
    fn host_case_mismatch_keeps_delegate_path() {
        // the delegate lowercases the host, so it cannot be located in the
        // input string; the parse still succeeds with the delegate's path
        let u = parse("https://EXAMPLE.COM/x").unwrap();
        assert!(!u.is_relative);
        assert_eq!(u.host, "example.com");
        assert_eq!(u.path, "/x");
    }

    #[test]
    fn opaque_url_keeps_scheme_and_opaque() {
        // `https://mailto:hello` has an invalid port, so the synthetic-scheme
        // retry fails and the delegate sees the original opaque URL
        let u = parse("mailto:hello").unwrap();
        assert!(u.is_relative);
        assert_eq!(u.scheme, "mailto");
        assert_eq!(u.opaque, "hello");
    }

    #[test]
    fn params_always_present() {
        let u = parse("https://example.com/x").unwrap();
        assert!(u.params.is_empty());
        assert_eq!(u.raw_query, "");
    }

    #[test]
    fn relative_implies_empty_host() {
        for input in ["/a", "admin", "admin/panel", "%0a%0d"] {
            let u = parse_url(input, true).unwrap();
            if u.is_relative {
                assert_eq!(u.host, "", "input {input:?}");
            }
        }
    }
}
