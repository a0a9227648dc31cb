//! Structured URL value object.
//!
//! [`Url`] is a composed struct of plain syntactic fields plus parser
//! metadata, not a wrapper around the delegate parser's type: the parser
//! copies only the fields it trusts, and fragment/query never come from the
//! delegate because they are extracted up front.

mod user_info;

pub use user_info::UserInfo;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;
use crate::merge::merge_paths;
use crate::params::Params;
use crate::parser;

/// A parsed URL or relative path.
///
/// Created by [`parse`](crate::parser::parse) (or `Clone`); `params` is owned
/// and always present, even when empty. `original` is the input with fragment
/// and query already stripped. `is_relative == true` implies an empty `host`.
///
/// `raw_query` is derivable by re-encoding `params`. Callers who mutate
/// `params` directly must call [`Url::resync`] before relying on `raw_query`;
/// this is a documented consistency contract, not automatic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    pub scheme: String,
    pub opaque: String,
    pub user: Option<UserInfo>,
    /// Host, including the port when one is present (`example.com:8080`).
    pub host: String,
    pub path: String,
    pub raw_path: String,
    pub raw_query: String,
    pub fragment: String,
    pub raw_fragment: String,
    pub force_query: bool,

    /// The input string with fragment and query stripped.
    pub original: String,
    /// Leniency flag the URL was parsed with.
    pub unsafe_parse: bool,
    /// Whether the input was classified as a relative path.
    pub is_relative: bool,
    /// Query parameters, decoded ahead of any host/path classification.
    pub params: Params,
}

impl Url {
    pub(crate) fn with_original(original: &str, unsafe_parse: bool) -> Self {
        Self {
            original: original.to_string(),
            unsafe_parse,
            ..Self::default()
        }
    }

    /// Recomputes `raw_query` from `params`.
    ///
    /// Call after mutating `params` directly and before serializing.
    pub fn resync(&mut self) {
        self.raw_query = self.params.encode();
    }

    /// Path + query + fragment, without scheme or host.
    ///
    /// The path is `/`-prefixed if it is not already; `?` and encoded params
    /// are appended when any exist, then `#` and the fragment when non-empty.
    pub fn relative_form(&self) -> String {
        let mut out = String::new();
        if !self.path.is_empty() {
            if !self.path.starts_with('/') {
                out.push('/');
            }
            out.push_str(&self.path);
        }
        if !self.params.is_empty() {
            out.push('?');
            out.push_str(&self.params.encode());
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&self.fragment);
        }
        out
    }

    /// Parses `rel_path` as a standalone URL value and merges it into `self`:
    /// params are unioned, paths are joined without normalization, and a
    /// non-empty parsed fragment overwrites `self.fragment`.
    pub fn merge_path(&mut self, rel_path: &str, unsafe_parse: bool) -> Result<(), ParseError> {
        let rel = parser::parse_url(rel_path, unsafe_parse)?;
        self.params.merge(rel.params);
        self.path = merge_paths(&self.path, &rel.path);
        if !rel.fragment.is_empty() {
            self.fragment = rel.fragment;
        }
        self.resync();
        Ok(())
    }

    /// Host without the port.
    pub fn hostname(&self) -> &str {
        match self.port_sep() {
            Some(i) => &self.host[..i],
            None => &self.host,
        }
    }

    /// Port as written in `host`, if any.
    pub fn port(&self) -> Option<&str> {
        self.port_sep().map(|i| &self.host[i + 1..])
    }

    /// Replaces the port in `host` when one is present, otherwise appends
    /// `:new_port`. Operates on the raw host string.
    pub fn update_port(&mut self, new_port: &str) {
        if new_port.is_empty() {
            return;
        }
        match self.port_sep() {
            Some(i) => {
                self.host.truncate(i + 1);
                self.host.push_str(new_port);
            }
            None => {
                self.host.push(':');
                self.host.push_str(new_port);
            }
        }
    }

    /// Byte index of the `:` separating host from port, if the host carries
    /// one. The last `:` of a bare IPv6 literal is not a separator.
    fn port_sep(&self) -> Option<usize> {
        let i = self.host.rfind(':')?;
        let port = &self.host[i + 1..];
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if let Some(j) = self.host.rfind(']') {
            if i < j {
                return None;
            }
        }
        Some(i)
    }
}

impl fmt::Display for Url {
    /// Full serialization: `scheme://[user@]host` + relative form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}://", self.scheme)?;
        }
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        f.write_str(&self.host)?;
        f.write_str(&self.relative_form())
    }
}
