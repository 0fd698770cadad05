//! # Kinship - people and pairwise relationships
//!
//! A small registry exposed over HTTP.
//!
//! Kinship provides:
//! - Person records keyed by a length-limited identifier
//! - Undirected relationships between two registered persons
//! - A lookup returning the relationship a person takes part in
//! - SQLite-backed storage that survives restarts

pub mod identifier;
pub mod person;
pub mod relationship;
pub mod storage;
pub mod service;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use identifier::{Identifier, MAX_IDENTIFIER_LEN};
pub use person::Person;
pub use relationship::Relationship;
pub use service::Registry;
pub use storage::SqliteStore;

/// Result type alias for Kinship operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which kind of record a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Person,
    Relationship,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Person => f.write_str("person"),
            Entity::Relationship => f.write_str("relationship"),
        }
    }
}

/// Error types for Kinship operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Name must not be blank")]
    InvalidName,

    #[error("Person exists: {0}")]
    PersonExists(String),

    #[error("No {entity} found for {identifier}")]
    NotFound { entity: Entity, identifier: String },

    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn person_not_found(identifier: impl Into<String>) -> Self {
        Error::NotFound { entity: Entity::Person, identifier: identifier.into() }
    }

    pub(crate) fn relationship_not_found(identifier: impl Into<String>) -> Self {
        Error::NotFound { entity: Entity::Relationship, identifier: identifier.into() }
    }
}
