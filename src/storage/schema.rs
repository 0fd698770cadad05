//! Database schema definitions

/// SQL to create the persons table
pub const CREATE_PERSONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS persons (
    identifier TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the relationships table
/// `id` records insertion order, which decides the "first" match on lookup
pub const CREATE_RELATIONSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS relationships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_a TEXT NOT NULL,
    participant_b TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_relationships_a ON relationships(participant_a)",
    "CREATE INDEX IF NOT EXISTS idx_relationships_b ON relationships(participant_b)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_PERSONS_TABLE, CREATE_RELATIONSHIPS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
