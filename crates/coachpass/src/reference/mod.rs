//! The flight reference table and its persistence.
//!
//! The table is an explicit value: callers load it, pass it to the lookup
//! engine by reference, and replace it wholesale on upload. There is no
//! ambient global copy. [`ReferenceStore`] is the only mutator, persisting
//! the table as a JSON array at a fixed path on every replace and reading
//! it back once at startup.

pub mod ingest;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::FlightReference;

/// An immutable snapshot of the uploaded flight reference table.
///
/// Duplicate flight numbers are permitted and preserved in upload order;
/// the lookup engine resolves them by first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    entries: Vec<FlightReference>,
}

impl ReferenceTable {
    /// Build a table from a sequence of entries. Any well-typed sequence is
    /// accepted, including an empty one.
    #[must_use]
    pub fn from_entries(entries: Vec<FlightReference>) -> Self {
        Self { entries }
    }

    /// The entries in upload order.
    #[must_use]
    pub fn entries(&self) -> &[FlightReference] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty (nothing uploaded yet).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Durable storage for the reference table.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    /// Path of the persisted JSON array.
    path: PathBuf,
}

impl ReferenceStore {
    /// Create a store over the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path of the persisted table.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted table.
    ///
    /// A missing file is not an error: it means nothing has been uploaded
    /// yet, and an empty table is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<ReferenceTable> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No reference table at {}", self.path.display());
                return Ok(ReferenceTable::default());
            }
            Err(e) => return Err(e.into()),
        };

        let table: ReferenceTable = serde_json::from_str(&text)?;
        debug!(
            "Loaded {} reference entries from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    /// Replace the persisted table wholesale.
    ///
    /// Prior entries are discarded in full; there is no merge. Accepts any
    /// table, including an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn replace(&self, table: &ReferenceTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string(table)?;
        std::fs::write(&self.path, json)?;

        info!(
            "Replaced reference table at {} ({} entries)",
            self.path.display(),
            table.len()
        );
        Ok(())
    }
}
