//! `coachpass` - offline flight-type checks and coach assignments
//!
//! This library provides the core functionality for looking up flights in an
//! uploaded reference table, recording passenger coach assignments in a local
//! `SQLite` store, and exchanging assignments between devices as QR codes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod qr;
pub mod record;
pub mod reference;
pub mod scan;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use lookup::{lookup, LookupOutcome};
pub use record::{AssignmentPayload, AssignmentRecord, FlightReference};
pub use reference::{ReferenceStore, ReferenceTable};
pub use store::{RecordStore, StoreStats};
