//! Table extraction for mSEMS scan files
//!
//! Re-reads an instrument file as a delimited table past the dialect's
//! fixed header block and pulls out the diameter, concentration and
//! timestamp columns.

use super::columns::ColumnLayout;
use crate::constants::{DATETIME_FORMAT, DATETIME_JOIN};
use crate::error::{MsemsError, Result};
use crate::models::{BinDiameters, Dialect, ExtractedTable, Grid};
use chrono::NaiveDateTime;
use csv::StringRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Extract the scan table of a file in the given dialect
pub fn extract_table(file_path: &Path, dialect: Dialect) -> Result<ExtractedTable> {
    let properties = dialect.properties();
    let file = File::open(file_path).map_err(MsemsError::Io)?;
    let mut reader = BufReader::new(file);

    // Skip the fixed header block
    let mut skipped = 0;
    let mut line = Vec::new();
    while skipped < properties.skip_rows {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(MsemsError::Io)? == 0 {
            return Err(MsemsError::UnsupportedLayout {
                path: file_path.to_path_buf(),
                reason: format!(
                    "file ends after {} lines, expected {} header rows for {} dialect",
                    skipped, properties.skip_rows, dialect
                ),
            });
        }
        skipped += 1;
    }

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(properties.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers, properties, file_path)?;
    let bins = layout.bin_count();

    let mut concentrations = Vec::new();
    let mut diameters = Vec::new();
    let mut timestamps = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;

        timestamps.push(parse_timestamp(&record, &layout, file_path, row)?);
        concentrations.extend(read_group(
            &record,
            &layout.concentration.indices,
            &layout.concentration.names,
            file_path,
            row,
        )?);

        if let Some(group) = &layout.diameter {
            diameters.extend(read_group(
                &record,
                &group.indices,
                &group.names,
                file_path,
                row,
            )?);
        }
    }

    let scans = timestamps.len();
    info!("Number of Scans: {}", scans);

    let concentrations = Grid::new(scans, bins, concentrations).ok_or_else(|| {
        MsemsError::ShapeMismatch {
            path: file_path.to_path_buf(),
            reason: format!("concentration values do not fill a {}x{} grid", scans, bins),
        }
    })?;

    let diameters = match &layout.diameter {
        Some(_) => {
            let grid = Grid::new(scans, bins, diameters).ok_or_else(|| {
                MsemsError::ShapeMismatch {
                    path: file_path.to_path_buf(),
                    reason: format!("diameter values do not fill a {}x{} grid", scans, bins),
                }
            })?;
            BinDiameters::PerScan(grid)
        }
        None => BinDiameters::Fixed(bin_index_axis(bins)),
    };

    debug!(
        "Extracted {} scans x {} bins from {} ({} dialect)",
        scans,
        bins,
        file_path.display(),
        dialect
    );

    Ok(ExtractedTable {
        diameters,
        concentrations,
        timestamps,
    })
}

/// Synthesized diameter axis 1..=N for tables without measured diameters
pub fn bin_index_axis(bins: usize) -> Vec<f32> {
    (1..=bins).map(|i| i as f32).collect()
}

/// Join separate date and time cells and parse them as one timestamp
pub fn parse_datetime(date: &str, time: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    let joined = format!("{}{}{}", date.trim(), DATETIME_JOIN, time.trim());
    NaiveDateTime::parse_from_str(&joined, DATETIME_FORMAT)
}

fn parse_timestamp(
    record: &StringRecord,
    layout: &ColumnLayout,
    file_path: &Path,
    row: usize,
) -> Result<NaiveDateTime> {
    let date = record.get(layout.date_index).unwrap_or_default();
    let time = record.get(layout.time_index).unwrap_or_default();

    parse_datetime(date, time).map_err(|source| MsemsError::InvalidTimestamp {
        path: file_path.to_path_buf(),
        row,
        value: format!("{}{}{}", date.trim(), DATETIME_JOIN, time.trim()),
        source,
    })
}

/// Read one row's cells of a column group as f32
fn read_group(
    record: &StringRecord,
    indices: &[usize],
    names: &[String],
    file_path: &Path,
    row: usize,
) -> Result<Vec<f32>> {
    indices
        .iter()
        .zip(names)
        .map(|(&index, name)| {
            let cell = record.get(index).unwrap_or_default();
            parse_cell(cell).ok_or_else(|| MsemsError::InvalidValue {
                path: file_path.to_path_buf(),
                row,
                column: name.clone(),
                value: cell.to_string(),
            })
        })
        .collect()
}

/// Parse a numeric cell; blank cells are missing values
fn parse_cell(cell: &str) -> Option<f32> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f32::NAN);
    }
    cell.parse::<f64>().ok().map(|value| value as f32)
}
