//! Value objects.

use super::{error::ValueObjectError, relay::LOCAL_CLIENT_ID};

/// Connection identifier assigned by the server at upgrade time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    /// Create a ClientId, rejecting empty values and the echo sentinel.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyClientId);
        }
        if value == LOCAL_CLIENT_ID {
            return Err(ValueObjectError::ReservedClientId(value));
        }
        Ok(Self(value))
    }

    /// Wrap a server-generated id, which is never empty nor the sentinel.
    pub(crate) fn generated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable handle shown next to a cursor, e.g. "Fancy Parrot".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(value))
    }

    /// Compose a name from two word-list entries.
    pub fn from_words(first: &str, second: &str) -> Self {
        Self(format!("{} {}", first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Cursor color as a `#RRGGBB` hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorColor(String);

impl CursorColor {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let is_hex = value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex {
            return Err(ValueObjectError::InvalidColor(value));
        }
        Ok(Self(value))
    }

    pub(crate) fn from_palette(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
