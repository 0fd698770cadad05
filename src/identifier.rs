//! Person identifier - the primary key of the registry
//!
//! The only rule is a maximum length of 11 characters, the length of a
//! Brazilian CPF number. Content is not checked: `"abc"` is as valid as
//! `"12345678901"`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest identifier accepted, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 11;

/// An identifier that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate a raw identifier.
    ///
    /// Length is counted in characters, so `"12345678901"` (11) passes and
    /// `"123456789012"` (12) fails with [`Error::InvalidIdentifier`].
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(Error::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
