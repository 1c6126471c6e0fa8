//! Pipeline tests for the processor module
//!
//! Builds synthetic mSEMS files in each dialect and runs them through the
//! full detect, extract and write sequence.

pub mod error_handling;

use crate::models::Dialect;
use std::fs;
use std::path::{Path, PathBuf};

/// One data row of a synthetic scan file
pub struct ScanRow {
    pub date: &'static str,
    pub time: &'static str,
    pub diameters: Vec<f32>,
    pub concentrations: Vec<f32>,
}

impl ScanRow {
    pub fn new(
        date: &'static str,
        time: &'static str,
        diameters: &[f32],
        concentrations: &[f32],
    ) -> Self {
        Self {
            date,
            time,
            diameters: diameters.to_vec(),
            concentrations: concentrations.to_vec(),
        }
    }
}

/// Comment block of exactly the dialect's skip-row length
pub fn header_block(dialect: Dialect) -> Vec<String> {
    let mut lines = Vec::new();
    if dialect == Dialect::UavProcessed {
        lines.push("#UAV Reader Version: 1.2".to_string());
    }
    lines.push("#mSEMS Serial Number: 107".to_string());
    lines.push("#scan_direction: 0".to_string());
    lines.push("#Sheath Flow: 2.5 lpm".to_string());

    while lines.len() < dialect.properties().skip_rows {
        lines.push(format!("#Setting{:02}: {}", lines.len(), lines.len() * 10));
    }
    lines
}

/// Column header row naming `bins` bins
pub fn table_header(dialect: Dialect, bins: usize) -> String {
    let mut columns: Vec<String> = match dialect {
        Dialect::IgorProcessed => vec!["#Date".into(), "Time".into()],
        _ => vec!["#YY/MM/DD".into(), "HR:MN:SC".into()],
    };

    match dialect {
        Dialect::Raw => {
            columns.push("scan_no".into());
            columns.extend((1..=bins).map(|i| format!("bin{}", i)));
            columns.push("sheath_flw".into());
        }
        Dialect::IgorProcessed => {
            columns.extend((1..=bins).map(|i| format!("Bin_Dia{}", i)));
            columns.extend((1..=bins).map(|i| format!("Bin_Conc{}", i)));
        }
        Dialect::UavProcessed => {
            columns.extend((1..=bins).map(|i| format!("bin_dia{}", i)));
            columns.extend((1..=bins).map(|i| format!("bin_conc{}", i)));
        }
    }
    columns.join("\t")
}

fn data_row(dialect: Dialect, index: usize, row: &ScanRow) -> String {
    let mut cells = vec![row.date.to_string(), row.time.to_string()];
    if dialect == Dialect::Raw {
        cells.push((index + 1).to_string());
    } else {
        cells.extend(row.diameters.iter().map(|d| d.to_string()));
    }
    cells.extend(row.concentrations.iter().map(|c| c.to_string()));
    if dialect == Dialect::Raw {
        cells.push("2.5".to_string());
    }
    cells.join("\t")
}

/// Write a complete scan file and return its path
pub fn write_scan_file(dir: &Path, file_name: &str, dialect: Dialect, rows: &[ScanRow]) -> PathBuf {
    let bins = rows.first().map_or(0, |r| r.concentrations.len());

    let mut lines = header_block(dialect);
    lines.push(table_header(dialect, bins));
    lines.extend(rows.iter().enumerate().map(|(i, row)| data_row(dialect, i, row)));

    let path = dir.join(file_name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

/// Two scans of three bins with drifting diameters
pub fn sample_rows() -> Vec<ScanRow> {
    vec![
        ScanRow::new("23/08/07", "10:06:19", &[10.0, 20.0, 40.0], &[100.0, 250.0, 80.0]),
        ScanRow::new("23/08/07", "10:07:19", &[12.0, 24.0, 44.0], &[120.0, 270.0, 60.0]),
    ]
}
