use std::io;
use std::path::Path;

use super::model::{FilteredSeries, IngestError, Sample};

/// Required CSV column holding the raw load-cell reading, kilograms-force.
pub const FORCE_COLUMN: &str = "Fuerza_kg";
/// Required CSV column holding the raw timestamp, milliseconds.
pub const TIME_COLUMN: &str = "Tiempo_ms";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a thrust curve from a CSV file.
///
/// Expected layout: a header row containing at least `Fuerza_kg` and
/// `Tiempo_ms`; any other columns are ignored.  Rows are converted to SI
/// (N, s) and readings below the noise floor are dropped, preserving row
/// order.
pub fn load_csv(path: &Path) -> Result<FilteredSeries, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_series(&mut reader)
}

/// Parse a thrust curve from any CSV reader.  Split out from [`load_csv`]
/// so the format can be exercised without touching the filesystem.
pub fn read_series<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<FilteredSeries, IngestError> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::BadRecord { row: 0, source })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let force_idx = headers
        .iter()
        .position(|h| h == FORCE_COLUMN)
        .ok_or(IngestError::MissingColumn(FORCE_COLUMN))?;
    let time_idx = headers
        .iter()
        .position(|h| h == TIME_COLUMN)
        .ok_or(IngestError::MissingColumn(TIME_COLUMN))?;

    let mut samples = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| IngestError::BadRecord { row: row_no, source })?;

        let force_kg = parse_field(&record, force_idx, FORCE_COLUMN, row_no)?;
        let time_ms = parse_field(&record, time_idx, TIME_COLUMN, row_no)?;

        samples.push(Sample { force_kg, time_ms });
    }

    if samples.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(FilteredSeries::from_samples(&samples))
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, IngestError> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse::<f64>().map_err(|_| IngestError::BadNumber {
        row,
        column,
        value: raw.to_string(),
    })
}
