//! Flight lookup over a reference table snapshot.
//!
//! A pure function: it takes the table explicitly and mutates nothing, so a
//! caller always knows which snapshot a result came from.

use crate::record::FlightReference;
use crate::reference::ReferenceTable;

/// Outcome of a flight-number lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The flight was found in the reference table.
    Found(FlightReference),
    /// The table has entries but none matched.
    NotFound,
    /// The reference table is empty; nothing has been uploaded yet.
    ///
    /// Distinct from [`LookupOutcome::NotFound`] so the caller can prompt
    /// for an upload instead of suggesting a typo.
    NoDataLoaded,
}

impl LookupOutcome {
    /// Check whether this outcome carries a matched flight.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Look up a flight number in the given reference table snapshot.
///
/// The match is case-insensitive exact string equality on the flight number
/// only: no trimming, no partial matching. If the table holds duplicate
/// flight numbers, the first match wins.
#[must_use]
pub fn lookup(table: &ReferenceTable, flight_number: &str) -> LookupOutcome {
    if table.is_empty() {
        return LookupOutcome::NoDataLoaded;
    }

    let needle = flight_number.to_lowercase();
    table
        .entries()
        .iter()
        .find(|entry| entry.flight_number.to_lowercase() == needle)
        .map_or(LookupOutcome::NotFound, |entry| {
            LookupOutcome::Found(entry.clone())
        })
}
