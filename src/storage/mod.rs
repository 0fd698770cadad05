//! Storage Layer - SQLite-backed persistence
//!
//! One database file holds both collections:
//! - persons(identifier, name, created_at, updated_at)
//! - relationships(id, participant_a, participant_b)
//!
//! `SqliteStore` owns the connection and hands out the two store views.

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, PersonStore, RelationshipStore, SqliteStore};
