//! Hostname type.
//!
//! DNS names are case-insensitive, so every hostname used for tenant routing
//! goes through [`Hostname::parse`], which produces a canonical lower-case
//! form without port or trailing dot.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Hostname`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameError {
    /// The input is empty (after trimming and removing the port).
    #[error("hostname cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("hostname must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// A label between dots is empty or longer than 63 characters.
    #[error("hostname label {0:?} is invalid")]
    InvalidLabel(String),
    /// The input contains a character that cannot appear in a hostname.
    #[error("hostname contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A normalized, lower-case DNS hostname.
///
/// ## Normalization
///
/// - Surrounding whitespace is trimmed
/// - A `:port` suffix is removed
/// - A single trailing `.` (fully-qualified form) is removed
/// - ASCII letters are lower-cased
///
/// ## Examples
///
/// ```
/// use simpshopy_core::Hostname;
///
/// let host = Hostname::parse("Shop.Acme.COM:443").unwrap();
/// assert_eq!(host.as_str(), "shop.acme.com");
/// assert_eq!(host.first_label(), "shop");
///
/// assert!(Hostname::parse("").is_err());
/// assert!(Hostname::parse("bad host.com").is_err());
/// assert!(Hostname::parse("double..dot").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    /// Maximum length of a hostname (RFC 1035).
    pub const MAX_LENGTH: usize = 253;

    /// Maximum length of a single label.
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Parse and normalize a `Hostname`.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input:
    /// - Is empty or longer than 253 characters
    /// - Has an empty label or a label longer than 63 characters
    /// - Contains anything other than ASCII letters, digits, `-` and `.`
    pub fn parse(s: &str) -> Result<Self, HostnameError> {
        let trimmed = s.trim();
        let without_port = match trimmed.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => trimmed,
        };
        let name = without_port.strip_suffix('.').unwrap_or(without_port);

        if name.is_empty() {
            return Err(HostnameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(HostnameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(HostnameError::InvalidCharacter(c));
        }

        for label in name.split('.') {
            if label.is_empty() || label.len() > Self::MAX_LABEL_LENGTH {
                return Err(HostnameError::InvalidLabel(label.to_owned()));
            }
        }

        Ok(Self(name.to_ascii_lowercase()))
    }

    /// Returns the hostname as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The left-most label (everything before the first `.`).
    #[must_use]
    pub fn first_label(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Whether this is exactly `parent` or a subdomain of it.
    #[must_use]
    pub fn is_within(&self, parent: &Self) -> bool {
        self.0 == parent.0
            || self
                .0
                .strip_suffix(parent.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Prefix this hostname with another label, e.g. `www`.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined name is not a valid hostname.
    pub fn with_label(&self, label: &str) -> Result<Self, HostnameError> {
        Self::parse(&format!("{label}.{}", self.0))
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hostname {
    type Error = HostnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Hostname> for String {
    fn from(host: Hostname) -> Self {
        host.0
    }
}
