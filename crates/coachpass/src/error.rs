//! Error types for coachpass.
//!
//! All failures surface as values of a single [`Error`] enum; nothing in the
//! library terminates the process. The CLI decides what to show the user and
//! whether a command exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for coachpass operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record store ===
    /// The assignment database could not be opened or created.
    #[error("failed to open assignment database at {path}: {source}")]
    StorageOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A write was rejected because the database or disk is full.
    #[error("assignment database is full; the write was rejected")]
    StorageFull,

    /// A database query failed.
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Failed to bring the database schema up to the expected version.
    #[error("database migration failed: {message}")]
    Migration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Reference table ===
    /// The uploaded reference file was unreadable or unparseable.
    #[error("malformed reference file {path}: {message}")]
    ReferenceFile {
        /// Path to the offending file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === QR encode/decode ===
    /// A scanned payload was not valid JSON or was missing required fields.
    #[error("could not decode scanned payload: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },

    /// The payload could not be encoded into a QR code.
    #[error("QR encoding failed: {0}")]
    QrEncode(String),

    /// Failed to read or write a QR image.
    #[error("QR image error: {0}")]
    Image(#[from] image::ImageError),

    // === Scanning ===
    /// The frame source could not be acquired (missing file, denied camera).
    #[error("scanner unavailable: {message}")]
    ScannerUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    // === I/O ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for coachpass operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(err: qrcode::types::QrError) -> Self {
        Self::QrEncode(err.to_string())
    }
}

impl Error {
    /// Create a new decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new malformed reference file error.
    #[must_use]
    pub fn reference_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ReferenceFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new scanner unavailable error.
    #[must_use]
    pub fn scanner_unavailable(message: impl Into<String>) -> Self {
        Self::ScannerUnavailable {
            message: message.into(),
        }
    }

    /// Check if this error is a payload decode failure.
    ///
    /// The scan loop treats decode failures as recoverable and keeps
    /// scanning; every other error ends the session.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this error means the store rejected a write for capacity.
    #[must_use]
    pub fn is_storage_full(&self) -> bool {
        matches!(self, Self::StorageFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = Error::decode("unexpected end of input");
        assert_eq!(
            err.to_string(),
            "could not decode scanned payload: unexpected end of input"
        );
    }

    #[test]
    fn test_error_is_decode() {
        assert!(Error::decode("bad").is_decode());
        assert!(!Error::StorageFull.is_decode());
    }

    #[test]
    fn test_error_is_storage_full() {
        assert!(Error::StorageFull.is_storage_full());
        assert!(!Error::decode("bad").is_storage_full());
    }

    #[test]
    fn test_reference_file_error_display() {
        let err = Error::reference_file("/tmp/flights.xlsx", "no sheets found");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/flights.xlsx"));
        assert!(msg.contains("no sheets found"));
    }

    #[test]
    fn test_scanner_unavailable_display() {
        let err = Error::scanner_unavailable("no frames provided");
        assert!(err.to_string().contains("no frames provided"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::Query(_)));
        }
    }

    #[test]
    fn test_storage_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::StorageOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }

    #[test]
    fn test_migration_error_display() {
        let err = Error::Migration {
            message: "unknown version".to_string(),
        };
        assert!(err.to_string().contains("unknown version"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "module_size must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("module_size"));
    }
}
