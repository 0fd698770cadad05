//! SQLite storage implementation

use std::path::Path;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use serde::Serialize;
use crate::{Result, Error};
use crate::identifier::Identifier;
use crate::person::Person;
use crate::relationship::Relationship;
use super::schema;

/// SQLite-backed storage for persons and relationships
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    pub fn persons(&self) -> PersonStore<'_> {
        PersonStore { conn: &self.conn }
    }

    pub fn relationships(&self) -> RelationshipStore<'_> {
        RelationshipStore { conn: &self.conn }
    }

    /// Delete both collections in one transaction
    pub fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM relationships", [])?;
        tx.execute("DELETE FROM persons", [])?;
        tx.commit()?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            persons: self.persons().count()?,
            relationships: self.relationships().count()?,
        })
    }
}

/// Person collection, keyed by identifier
pub struct PersonStore<'a> {
    conn: &'a Connection,
}

impl PersonStore<'_> {
    /// Insert a person, failing with `DuplicateIdentifier` if the key is taken.
    ///
    /// Only the identifier participates in uniqueness; two persons may share a name.
    pub fn insert(&self, person: Person) -> Result<Person> {
        let inserted = self.conn.execute(
            r#"
            INSERT INTO persons (identifier, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                person.identifier.as_str(),
                person.name,
                person.created_at.to_rfc3339(),
                person.updated_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(person),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                Err(Error::DuplicateIdentifier(person.identifier.into_inner()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a person by exact identifier
    pub fn find_by_identifier(&self, identifier: &str) -> Result<Option<Person>> {
        self.conn
            .query_row(
                "SELECT identifier, name, created_at, updated_at FROM persons WHERE identifier = ?1",
                [identifier],
                row_to_person,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM persons", [])?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Relationship collection, searchable by either participant
pub struct RelationshipStore<'a> {
    conn: &'a Connection,
}

impl RelationshipStore<'_> {
    /// Append a relationship. Callers are expected to have checked that
    /// both participants exist.
    pub fn insert(&self, participant_a: Identifier, participant_b: Identifier) -> Result<Relationship> {
        self.conn.execute(
            "INSERT INTO relationships (participant_a, participant_b) VALUES (?1, ?2)",
            params![participant_a.as_str(), participant_b.as_str()],
        )?;
        Ok(Relationship::new(participant_a, participant_b))
    }

    /// First relationship, in insertion order, with `identifier` on either side.
    ///
    /// Later relationships for the same person are never returned.
    pub fn find_by_participant(&self, identifier: &str) -> Result<Option<Relationship>> {
        let found = self.conn
            .query_row(
                r#"
                SELECT participant_a, participant_b FROM relationships
                WHERE participant_a = ?1 OR participant_b = ?1
                ORDER BY id
                LIMIT 1
                "#,
                [identifier],
                row_to_relationship,
            )
            .optional()?;

        debug_assert!(found.as_ref().is_none_or(|rel| rel.involves(identifier)));
        Ok(found)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM relationships", [])?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM relationships", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Helper to convert a row to a Person
fn row_to_person(row: &rusqlite::Row) -> rusqlite::Result<Person> {
    let identifier: String = row.get(0)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(Person {
        identifier: identifier_column(0, &identifier)?,
        name: row.get(1)?,
        created_at: timestamp_column(2, &created_at)?,
        updated_at: timestamp_column(3, &updated_at)?,
    })
}

/// Helper to convert a row to a Relationship
fn row_to_relationship(row: &rusqlite::Row) -> rusqlite::Result<Relationship> {
    let a: String = row.get(0)?;
    let b: String = row.get(1)?;
    Ok(Relationship::new(identifier_column(0, &a)?, identifier_column(1, &b)?))
}

fn identifier_column(idx: usize, raw: &str) -> rusqlite::Result<Identifier> {
    Identifier::parse(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_column(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub persons: usize,
    pub relationships: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Persons: {}", self.persons)?;
        writeln!(f, "  Relationships: {}", self.relationships)
    }
}
