//! Reference file ingestion.
//!
//! Reads an uploaded spreadsheet into a [`ReferenceTable`]. The first sheet
//! of an xlsx/xls workbook (or a csv file) is mapped column-for-column by
//! header name: `flightNumber`, `type`, `flightName`. Unrecognized columns
//! are ignored. Rows missing a required column are still admitted, with the
//! absent fields left empty, and counted as partial in the summary.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::FlightReference;
use crate::reference::ReferenceTable;

/// Header of the flight number column.
const COL_FLIGHT_NUMBER: &str = "flightNumber";
/// Header of the flight type column.
const COL_TYPE: &str = "type";
/// Header of the flight name column.
const COL_FLIGHT_NAME: &str = "flightName";

/// Summary of an ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Rows read from the sheet (excluding the header and fully empty rows).
    pub total_rows: usize,
    /// Rows admitted with one or more required fields missing.
    pub partial_rows: usize,
}

/// Load a reference file into a table.
///
/// Dispatches on the file extension: `.xlsx`/`.xlsm`/`.xls`/`.ods` are read
/// with calamine (first sheet only), `.csv` with the csv crate.
///
/// # Errors
///
/// Returns [`Error::ReferenceFile`] if the file is unreadable, unparseable,
/// or has an unsupported extension.
pub fn load_reference_file(path: impl AsRef<Path>) -> Result<(ReferenceTable, IngestSummary)> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let (table, summary) = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        other => {
            return Err(Error::reference_file(
                path,
                format!("unsupported file extension '{other}' (expected xlsx, xls, or csv)"),
            ))
        }
    };

    if summary.partial_rows > 0 {
        warn!(
            "{} of {} reference rows were missing required columns",
            summary.partial_rows, summary.total_rows
        );
    }
    debug!(
        "Ingested {} reference entries from {}",
        table.len(),
        path.display()
    );
    Ok((table, summary))
}

/// Positions of the recognized columns within a header row.
#[derive(Debug, Default)]
struct ColumnMap {
    flight_number: Option<usize>,
    flight_type: Option<usize>,
    flight_name: Option<usize>,
}

impl ColumnMap {
    fn from_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Self {
        let mut map = Self::default();
        for (idx, header) in headers.enumerate() {
            match header.trim() {
                COL_FLIGHT_NUMBER => map.flight_number.get_or_insert(idx),
                COL_TYPE => map.flight_type.get_or_insert(idx),
                COL_FLIGHT_NAME => map.flight_name.get_or_insert(idx),
                // Unrecognized columns are ignored
                _ => continue,
            };
        }
        map
    }
}

/// Read the first sheet of a workbook.
fn load_workbook(path: &Path) -> Result<(ReferenceTable, IngestSummary)> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| Error::reference_file(path, e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::reference_file(path, "workbook has no sheets"))?
        .map_err(|e| Error::reference_file(path, e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((ReferenceTable::default(), IngestSummary::default()));
    };

    let header_texts: Vec<String> = header_row.iter().map(cell_text).collect();
    let columns = ColumnMap::from_headers(header_texts.iter().map(String::as_str));

    let mut entries = Vec::new();
    let mut summary = IngestSummary::default();
    for row in rows {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(cell_text);
        let entry = FlightReference {
            flight_number: cell(columns.flight_number).unwrap_or_default(),
            flight_type: cell(columns.flight_type).unwrap_or_default(),
            flight_name: cell(columns.flight_name).unwrap_or_default(),
        };
        admit(entry, &mut entries, &mut summary);
    }

    Ok((ReferenceTable::from_entries(entries), summary))
}

/// Read a csv file with a header row.
fn load_csv(path: &Path) -> Result<(ReferenceTable, IngestSummary)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::reference_file(path, e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::reference_file(path, e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(headers.iter());

    let mut entries = Vec::new();
    let mut summary = IngestSummary::default();
    for result in reader.records() {
        let record = result.map_err(|e| Error::reference_file(path, e.to_string()))?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(std::string::ToString::to_string)
        };
        let entry = FlightReference {
            flight_number: cell(columns.flight_number).unwrap_or_default(),
            flight_type: cell(columns.flight_type).unwrap_or_default(),
            flight_name: cell(columns.flight_name).unwrap_or_default(),
        };
        admit(entry, &mut entries, &mut summary);
    }

    Ok((ReferenceTable::from_entries(entries), summary))
}

/// Admit a row into the entry list, skipping fully empty rows and counting
/// partial ones.
fn admit(entry: FlightReference, entries: &mut Vec<FlightReference>, summary: &mut IngestSummary) {
    let all_empty = entry.flight_number.is_empty()
        && entry.flight_type.is_empty()
        && entry.flight_name.is_empty();
    if all_empty {
        return;
    }

    summary.total_rows += 1;
    if !entry.is_complete() {
        summary.partial_rows += 1;
    }
    entries.push(entry);
}

/// Text content of a workbook cell; empty cells become empty strings.
fn cell_text(data: &Data) -> String {
    if data.is_empty() {
        String::new()
    } else {
        data.as_string().unwrap_or_default()
    }
}
