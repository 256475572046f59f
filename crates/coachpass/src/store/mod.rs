//! The assignment record store.
//!
//! `SQLite`-backed persistence for coach assignments. The store is
//! append-and-list only: records are never updated or deleted through this
//! tool, and every insert gets a fresh strictly increasing id from the
//! database.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::AssignmentRecord;

/// Persistent store for assignment records.
///
/// Opened lazily on first use and kept open for the process lifetime; there
/// is no explicit close. All access goes through one connection, which
/// serializes id allocation with the write itself.
#[derive(Debug)]
pub struct RecordStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl RecordStore {
    /// Open or create the record store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and initializes the schema on a fresh database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageOpen`] if the database cannot be opened, or a
    /// migration error if the schema cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening assignment database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StorageOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps reads cheap while a write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Assignment database ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert an assignment record and return its assigned id.
    ///
    /// Ids are assigned by the database and strictly increase across the
    /// store's lifetime. Identical inputs are NOT deduplicated: every save
    /// is a distinct record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageFull`] if the write is rejected for capacity,
    /// or a query error for any other database failure.
    pub fn insert(&self, record: &AssignmentRecord) -> Result<i64> {
        let created_at = record.created_at.to_rfc3339();

        let result = self.conn.execute(
            r"
            INSERT INTO assignments (flight_number, flight_type, flight_name, coach_number, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                record.flight_number,
                record.flight_type,
                record.flight_name,
                record.coach_number,
                created_at,
            ],
        );

        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                debug!("Inserted assignment record with id {}", id);
                Ok(id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::DiskFull =>
            {
                Err(Error::StorageFull)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a record by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<AssignmentRecord>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, flight_number, flight_type, flight_name, coach_number, created_at
                FROM assignments WHERE id = ?1
                ",
                [id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(result)
    }

    /// Return all stored records in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<AssignmentRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, flight_number, flight_type, flight_name, coach_number, created_at
            FROM assignments ORDER BY id ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assignments", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get store statistics for the status surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let total_records = self.count()?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT created_at FROM assignments ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let newest_record = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreStats {
            total_records,
            newest_record,
            db_size_bytes,
        })
    }

    /// Convert a database row to an [`AssignmentRecord`].
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<AssignmentRecord> {
        let id: i64 = row.get(0)?;
        let flight_number: String = row.get(1)?;
        let flight_type: String = row.get(2)?;
        let flight_name: String = row.get(3)?;
        let coach_number: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(AssignmentRecord {
            id: Some(id),
            flight_number,
            flight_type,
            flight_name,
            coach_number,
            created_at,
        })
    }
}

/// Statistics about the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of assignment records stored.
    pub total_records: i64,
    /// Creation time of the most recent record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlightReference;

    fn create_test_store() -> RecordStore {
        RecordStore::open_in_memory().expect("failed to create test store")
    }

    fn sample_record(coach: &str) -> AssignmentRecord {
        let flight = FlightReference::new("AI101", "Domestic Arrival", "Air India Express");
        AssignmentRecord::new(&flight, coach)
    }

    #[test]
    fn test_open_in_memory() {
        assert!(RecordStore::open_in_memory().is_ok());
    }

    #[test]
    fn test_insert_and_get() {
        let store = create_test_store();
        let id = store.insert(&sample_record("COACH-001")).unwrap();

        let retrieved = store.get(id).unwrap().unwrap();
        assert_eq!(retrieved.id, Some(id));
        assert_eq!(retrieved.flight_number, "AI101");
        assert_eq!(retrieved.coach_number, "COACH-001");
    }

    #[test]
    fn test_sequential_inserts_yield_strictly_increasing_ids() {
        let store = create_test_store();

        let mut ids = Vec::new();
        for i in 0..5 {
            let id = store.insert(&sample_record(&format!("COACH-{i:03}"))).unwrap();
            ids.push(id);
        }

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "ids must strictly increase: {ids:?}");
        }

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 5);
        let stored_ids: Vec<i64> = all.iter().filter_map(|r| r.id).collect();
        assert_eq!(stored_ids, ids);
    }

    #[test]
    fn test_identical_inputs_not_deduplicated() {
        let store = create_test_store();
        let record = sample_record("COACH-001");

        let id1 = store.insert(&record).unwrap();
        let id2 = store.insert(&record).unwrap();

        assert_ne!(id1, id2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        assert!(store.get(99999).unwrap().is_none());
    }

    #[test]
    fn test_list_all_empty() {
        let store = create_test_store();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store.insert(&sample_record("COACH-001")).unwrap();
        store.insert(&sample_record("COACH-002")).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let store = create_test_store();
        let flight = FlightReference::new("6E204", "International Departure", "IndiGo");
        let record = AssignmentRecord::new(&flight, "COACH-014");

        let id = store.insert(&record).unwrap();
        let back = store.get(id).unwrap().unwrap();

        assert_eq!(back.flight_number, "6E204");
        assert_eq!(back.flight_type, "International Departure");
        assert_eq!(back.flight_name, "IndiGo");
        assert_eq!(back.coach_number, "COACH-014");
        // RFC 3339 text keeps full precision on the way through SQLite
        assert_eq!(back.created_at, record.created_at);
    }

    #[test]
    fn test_stats_empty() {
        let store = create_test_store();
        let stats = store.stats().unwrap();
        assert_eq!(stats.total_records, 0);
        assert!(stats.newest_record.is_none());
    }

    #[test]
    fn test_stats_with_data() {
        let store = create_test_store();
        store.insert(&sample_record("COACH-001")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_records, 1);
        assert!(stats.newest_record.is_some());
    }

    #[test]
    fn test_path() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("coachpass_test_{}.db", std::process::id()));

        let store = RecordStore::open(&db_path).unwrap();
        store.insert(&sample_record("COACH-001")).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.path(), db_path);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir.join(format!(
            "coachpass_test_{}/nested/assignments.db",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let store = RecordStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }

    #[test]
    fn test_ids_survive_reopen() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("coachpass_reopen_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);

        let first_id;
        {
            let store = RecordStore::open(&db_path).unwrap();
            first_id = store.insert(&sample_record("COACH-001")).unwrap();
        }
        {
            let store = RecordStore::open(&db_path).unwrap();
            let second_id = store.insert(&sample_record("COACH-002")).unwrap();
            assert!(second_id > first_id);
            assert_eq!(store.count().unwrap(), 2);
        }

        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_saved_record_payload_survives_qr_roundtrip() {
        use chrono::TimeZone;

        let store = create_test_store();
        let mut record = sample_record("COACH-001");
        record.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let id = store.insert(&record).unwrap();
        record.id = Some(id);

        let payload = record.payload();
        let decoded = crate::qr::decode(&crate::qr::encode(&payload).unwrap()).unwrap();

        assert_eq!(decoded.flight_number, "AI101");
        assert_eq!(decoded.flight_type, "Domestic Arrival");
        assert_eq!(decoded.flight_name, "Air India Express");
        assert_eq!(decoded.coach_number, "COACH-001");
        assert_eq!(decoded.timestamp, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_unicode_fields() {
        let store = create_test_store();
        let flight = FlightReference::new("AI101", "国内線到着", "エア・インディア");
        let id = store.insert(&AssignmentRecord::new(&flight, "COACH-001")).unwrap();

        let back = store.get(id).unwrap().unwrap();
        assert_eq!(back.flight_type, "国内線到着");
        assert_eq!(back.flight_name, "エア・インディア");
    }
}
