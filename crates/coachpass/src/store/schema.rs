//! `SQLite` schema definitions for the assignment record store.

/// SQL statement to create the assignments table.
///
/// `AUTOINCREMENT` keeps ids strictly increasing for the lifetime of the
/// database file. No secondary indexes: the store is append-and-list only.
pub const CREATE_ASSIGNMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    flight_number TEXT NOT NULL,
    flight_type TEXT NOT NULL,
    flight_name TEXT NOT NULL,
    coach_number TEXT NOT NULL,
    created_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ASSIGNMENTS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_assignments_table_contains_required_columns() {
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("flight_number TEXT NOT NULL"));
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("flight_type TEXT NOT NULL"));
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("flight_name TEXT NOT NULL"));
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("coach_number TEXT NOT NULL"));
        assert!(CREATE_ASSIGNMENTS_TABLE.contains("created_at TEXT NOT NULL"));
    }

    #[test]
    fn test_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
