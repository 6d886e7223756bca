//! Route prefix type used to classify request paths.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RoutePrefix`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutePrefixError {
    /// The input string is empty.
    #[error("route prefix cannot be empty")]
    Empty,
    /// The input does not start with `/`.
    #[error("route prefix must start with '/' (got {0:?})")]
    NotAbsolute(String),
    /// The input carries a query string or fragment.
    #[error("route prefix must be a bare path (got {0:?})")]
    NotBarePath(String),
}

/// An absolute URL path prefix matched on segment boundaries.
///
/// `/profile` matches `/profile`, `/profile/` and `/profile/orders`, but not
/// `/profiles`. The root prefix `/` matches every path.
///
/// ## Examples
///
/// ```
/// use componentry_core::RoutePrefix;
///
/// let prefix = RoutePrefix::parse("/profile").unwrap();
/// assert!(prefix.matches("/profile/orders"));
/// assert!(!prefix.matches("/profiles"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePrefix(String);

impl RoutePrefix {
    /// Parse a `RoutePrefix`, trimming whitespace and any trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not absolute, or contains a
    /// query string or fragment.
    pub fn parse(s: &str) -> Result<Self, RoutePrefixError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RoutePrefixError::Empty);
        }
        if !s.starts_with('/') {
            return Err(RoutePrefixError::NotAbsolute(s.to_owned()));
        }
        if s.contains(['?', '#']) {
            return Err(RoutePrefixError::NotBarePath(s.to_owned()));
        }

        let trimmed = s.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self("/".to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse a comma-separated list of prefixes, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails to parse.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, RoutePrefixError> {
        s.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns true if `path` equals this prefix or lies beneath it.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        path.strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Returns the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoutePrefix {
    type Err = RoutePrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoutePrefix {
    type Error = RoutePrefixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoutePrefix> for String {
    fn from(prefix: RoutePrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for RoutePrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
