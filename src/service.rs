//! Query service - the single entry point over both stores
//!
//! Every operation validates first, then touches storage, and returns a
//! typed [`Error`] on the first violation. The registry owns its
//! [`SqliteStore`]; callers that share it across threads wrap the whole
//! registry in one lock.

use std::path::Path;
use chrono::Utc;
use crate::{Error, Result};
use crate::identifier::Identifier;
use crate::person::Person;
use crate::relationship::Relationship;
use crate::storage::{DbStats, SqliteStore};

pub struct Registry {
    store: SqliteStore,
}

impl Registry {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    /// Open (or create, seeded empty) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::new(SqliteStore::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }

    /// Register a new person.
    ///
    /// Fails with `InvalidIdentifier` for identifiers over 11 characters,
    /// `InvalidName` for a blank name and `PersonExists` when the identifier
    /// is already taken.
    pub fn create_person(&self, identifier: &str, name: &str) -> Result<Person> {
        let identifier = Identifier::parse(identifier)?;
        if name.trim().is_empty() {
            return Err(Error::InvalidName);
        }

        let persons = self.store.persons();
        if persons.find_by_identifier(identifier.as_str())?.is_some() {
            tracing::debug!(%identifier, "Rejected duplicate person");
            return Err(Error::PersonExists(identifier.into_inner()));
        }

        let person = Person::new(identifier, name, Utc::now());
        let person = persons.insert(person).map_err(|e| match e {
            Error::DuplicateIdentifier(id) => Error::PersonExists(id),
            other => other,
        })?;

        tracing::info!(identifier = %person.identifier, "Created person");
        Ok(person)
    }

    pub fn get_person(&self, identifier: &str) -> Result<Person> {
        self.store
            .persons()
            .find_by_identifier(identifier)?
            .ok_or_else(|| Error::person_not_found(identifier))
    }

    /// Relate two existing persons.
    ///
    /// Both sides must be registered; `NotFound` names the first missing one.
    /// Self-pairs and repeats of an existing pair are accepted.
    pub fn create_relationship(&self, participant_a: &str, participant_b: &str) -> Result<Relationship> {
        let a = self.get_person(participant_a)?;
        let b = self.get_person(participant_b)?;

        let relationship = self
            .store
            .relationships()
            .insert(a.identifier, b.identifier)?;

        tracing::info!(
            participant_a = %relationship.participant_a,
            participant_b = %relationship.participant_b,
            "Created relationship"
        );
        Ok(relationship)
    }

    /// Find the relationship `identifier` takes part in.
    ///
    /// Only the first relationship recorded for the person is returned, even
    /// when several exist.
    pub fn find_relationships_for(&self, identifier: &str) -> Result<Relationship> {
        let identifier = Identifier::parse(identifier)?;
        let person = self.get_person(identifier.as_str())?;

        self.store
            .relationships()
            .find_by_participant(person.identifier.as_str())?
            .ok_or_else(|| Error::relationship_not_found(identifier.into_inner()))
    }

    /// Remove every person and relationship
    pub fn reset_all(&mut self) -> Result<()> {
        self.store.clear_all()?;
        tracing::info!("Cleared all persons and relationships");
        Ok(())
    }

    pub fn stats(&self) -> Result<DbStats> {
        self.store.stats()
    }
}
