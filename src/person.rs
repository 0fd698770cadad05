//! Person records

use crate::identifier::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered person.
///
/// Records are created once and never updated; `updated_at` equals
/// `created_at` and is kept for wire compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique key across all persons
    pub identifier: Identifier,
    /// Display name, never blank
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a person stamped with the given time.
    pub fn new(identifier: Identifier, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            identifier,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
