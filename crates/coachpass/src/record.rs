//! Core domain types for coachpass.
//!
//! Defines the reference-table entry, the persisted assignment record, and
//! the wire payload carried by a QR code.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the uploaded flight reference table.
///
/// The table is the source of truth for flight classification and is
/// replaced wholesale on each upload. Serialized field names match the
/// original upload format (`flightNumber`, `type`, `flightName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightReference {
    /// The flight number, e.g. `AI101`.
    #[serde(rename = "flightNumber", default)]
    pub flight_number: String,

    /// The flight classification, e.g. `Domestic Arrival`.
    #[serde(rename = "type", default)]
    pub flight_type: String,

    /// The carrier/flight display name, e.g. `Air India Express`.
    #[serde(rename = "flightName", default)]
    pub flight_name: String,
}

impl FlightReference {
    /// Create a reference entry from its three fields.
    #[must_use]
    pub fn new(
        flight_number: impl Into<String>,
        flight_type: impl Into<String>,
        flight_name: impl Into<String>,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            flight_type: flight_type.into(),
            flight_name: flight_name.into(),
        }
    }

    /// Check whether all three fields are present.
    ///
    /// Spreadsheet rows missing a required column are still admitted, but
    /// the ingest summary counts them as partial.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.flight_number.is_empty()
            && !self.flight_type.is_empty()
            && !self.flight_name.is_empty()
    }
}

/// A persisted coach assignment.
///
/// Created exactly once per successful save, never mutated, never deleted
/// through this tool. The id is assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    /// Unique identifier (assigned by the record store).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The flight number as looked up.
    pub flight_number: String,

    /// The flight classification at lookup time.
    pub flight_type: String,

    /// The flight display name at lookup time.
    pub flight_name: String,

    /// The coach assigned to the passenger.
    pub coach_number: String,

    /// When this assignment was recorded.
    pub created_at: DateTime<Utc>,
}

impl AssignmentRecord {
    /// Create a new, unsaved assignment from a matched reference entry and a
    /// chosen coach. The timestamp is set to now.
    #[must_use]
    pub fn new(flight: &FlightReference, coach_number: impl Into<String>) -> Self {
        Self {
            id: None,
            flight_number: flight.flight_number.clone(),
            flight_type: flight.flight_type.clone(),
            flight_name: flight.flight_name.clone(),
            coach_number: coach_number.into(),
            created_at: Utc::now(),
        }
    }

    /// Build the QR wire payload for this record.
    #[must_use]
    pub fn payload(&self) -> AssignmentPayload {
        AssignmentPayload {
            flight_number: self.flight_number.clone(),
            flight_type: self.flight_type.clone(),
            flight_name: self.flight_name.clone(),
            coach_number: self.coach_number.clone(),
            timestamp: self
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The JSON payload carried by a QR code.
///
/// This is the only bit-exact contract in the system: field names and casing
/// must stay exactly `flightNumber`, `flightType`, `flightName`,
/// `coachNumber`, `timestamp` to interoperate with previously generated
/// codes. The timestamp is kept as the original ISO-8601 text so a decoded
/// payload reproduces the encoded one byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    /// The flight number.
    pub flight_number: String,
    /// The flight classification.
    pub flight_type: String,
    /// The flight display name.
    pub flight_name: String,
    /// The assigned coach.
    pub coach_number: String,
    /// ISO-8601 creation timestamp.
    pub timestamp: String,
}
