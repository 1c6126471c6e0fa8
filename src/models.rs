//! Core data structures and types for mSEMS processing.
//!
//! Defines the file dialects, their fixed table properties, the extracted
//! table, and the gridded size distribution written to NetCDF.

use crate::constants::{
    HMS_TIME_COLUMN, IGOR_DATE_COLUMN, IGOR_MARKER, IGOR_TIME_COLUMN, PROCESSED_SKIP_ROWS,
    RAW_MARKER, RAW_SKIP_ROWS, TAB_DELIMITER, UAV_MARKER, YMD_DATE_COLUMN,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Free-form `#key: value` header metadata
pub type Metadata = BTreeMap<String, String>;

/// Text layouts produced by the mSEMS instrument and its post-processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Unprocessed instrument output with bin counts only
    #[serde(rename = "raw")]
    Raw,
    /// Inverted by the Igor toolkit
    #[serde(rename = "igor")]
    IgorProcessed,
    /// Inverted by the UAV reader
    #[serde(rename = "uav")]
    UavProcessed,
}

impl Dialect {
    /// Dialects in the order their markers are tested within one line
    pub const MARKER_ORDER: [Dialect; 3] =
        [Dialect::UavProcessed, Dialect::IgorProcessed, Dialect::Raw];

    /// Short tag stored in the `file_type` attribute
    pub fn tag(&self) -> &'static str {
        match self {
            Dialect::Raw => "raw",
            Dialect::IgorProcessed => "igor",
            Dialect::UavProcessed => "uav",
        }
    }

    /// Header phrase whose presence identifies this dialect
    pub fn marker(&self) -> &'static str {
        match self {
            Dialect::Raw => RAW_MARKER,
            Dialect::IgorProcessed => IGOR_MARKER,
            Dialect::UavProcessed => UAV_MARKER,
        }
    }

    /// Fixed table properties for this dialect
    pub fn properties(&self) -> &'static DialectProperties {
        match self {
            Dialect::Raw => &RAW_PROPERTIES,
            Dialect::IgorProcessed => &IGOR_PROPERTIES,
            Dialect::UavProcessed => &UAV_PROPERTIES,
        }
    }

    /// Whether diameters are read from the table rather than synthesized
    pub fn has_measured_diameters(&self) -> bool {
        !self.properties().diameter_columns.is_empty()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Dialect::Raw),
            "igor" => Ok(Dialect::IgorProcessed),
            "uav" => Ok(Dialect::UavProcessed),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}

/// Fixed layout of one dialect's data table
///
/// Column groups are ordered candidate lists: the first candidate matching
/// at least one column wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProperties {
    pub skip_rows: usize,
    pub delimiter: u8,
    /// Substrings selecting the diameter group; empty when diameters are synthesized
    pub diameter_columns: &'static [&'static str],
    /// Substrings selecting the concentration group
    pub concentration_columns: &'static [&'static str],
    /// Exact names of the date column
    pub date_columns: &'static [&'static str],
    /// Exact names of the time column
    pub time_columns: &'static [&'static str],
}

pub static RAW_PROPERTIES: DialectProperties = DialectProperties {
    skip_rows: RAW_SKIP_ROWS,
    delimiter: TAB_DELIMITER,
    diameter_columns: &[],
    concentration_columns: &["bin"],
    date_columns: &[YMD_DATE_COLUMN, IGOR_DATE_COLUMN],
    time_columns: &[HMS_TIME_COLUMN, IGOR_TIME_COLUMN],
};

pub static IGOR_PROPERTIES: DialectProperties = DialectProperties {
    skip_rows: PROCESSED_SKIP_ROWS,
    delimiter: TAB_DELIMITER,
    diameter_columns: &["Bin_Dia", "bin_dia"],
    concentration_columns: &["Bin_Conc", "bin_conc"],
    date_columns: &[IGOR_DATE_COLUMN, YMD_DATE_COLUMN],
    time_columns: &[IGOR_TIME_COLUMN, HMS_TIME_COLUMN],
};

pub static UAV_PROPERTIES: DialectProperties = DialectProperties {
    skip_rows: PROCESSED_SKIP_ROWS,
    delimiter: TAB_DELIMITER,
    diameter_columns: &["bin_dia", "Bin_Dia"],
    concentration_columns: &["bin_conc", "Bin_Conc"],
    date_columns: &[YMD_DATE_COLUMN, IGOR_DATE_COLUMN],
    time_columns: &[HMS_TIME_COLUMN, IGOR_TIME_COLUMN],
};

/// Row-major 2-D float grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl Grid {
    /// Build a grid from a flat row-major buffer
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Option<Self> {
        (rows * cols == values.len()).then_some(Self { rows, cols, values })
    }

    /// Build a grid from equally sized rows
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        let values = rows.into_iter().flatten().collect();
        Some(Self {
            rows: n_rows,
            cols,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if col >= self.cols {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    /// Arithmetic mean of every column across all rows
    ///
    /// Accumulates in f64. An empty grid yields NaN for each column.
    pub fn column_means(&self) -> Vec<f32> {
        let mut sums = vec![0.0f64; self.cols];
        for row in self.values.chunks(self.cols.max(1)) {
            for (sum, &value) in sums.iter_mut().zip(row) {
                *sum += value as f64;
            }
        }
        sums.into_iter()
            .map(|sum| (sum / self.rows as f64) as f32)
            .collect()
    }

    /// Column means that skip NaN cells; all-NaN columns stay NaN
    pub fn column_nan_means(&self) -> Vec<f32> {
        let mut sums = vec![0.0f64; self.cols];
        let mut counts = vec![0usize; self.cols];
        for row in self.values.chunks(self.cols.max(1)) {
            for (col, &value) in row.iter().enumerate() {
                if !value.is_nan() {
                    sums[col] += value as f64;
                    counts[col] += 1;
                }
            }
        }
        sums.into_iter()
            .zip(counts)
            .map(|(sum, count)| {
                if count == 0 {
                    f32::NAN
                } else {
                    (sum / count as f64) as f32
                }
            })
            .collect()
    }
}

/// Diameter axis of an extracted table
#[derive(Debug, Clone, PartialEq)]
pub enum BinDiameters {
    /// One value per bin, shared by every scan
    Fixed(Vec<f32>),
    /// One reading per scan and bin
    PerScan(Grid),
}

impl BinDiameters {
    /// Number of bins described
    pub fn bin_count(&self) -> usize {
        match self {
            BinDiameters::Fixed(values) => values.len(),
            BinDiameters::PerScan(grid) => grid.cols(),
        }
    }

    /// Collapse to a single bin axis
    ///
    /// Per-scan readings are averaged column-wise rather than interpolated
    /// onto a common grid.
    pub fn bin_axis(&self) -> Vec<f32> {
        match self {
            BinDiameters::Fixed(values) => values.clone(),
            BinDiameters::PerScan(grid) => grid.column_means(),
        }
    }
}

/// Columns pulled out of one input file, aligned by scan index
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub diameters: BinDiameters,
    pub concentrations: Grid,
    pub timestamps: Vec<NaiveDateTime>,
}

impl ExtractedTable {
    pub fn scan_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn bin_count(&self) -> usize {
        self.concentrations.cols()
    }
}

/// Concentration grid over (time, bin) with coordinates and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct SizeDistribution {
    pub time: Vec<NaiveDateTime>,
    pub bin: Vec<f32>,
    pub conc: Grid,
    pub attributes: Metadata,
}

impl SizeDistribution {
    /// Dialect recorded in the `file_type` attribute, if any
    pub fn file_type(&self) -> Option<Dialect> {
        self.attributes
            .get(crate::constants::FILE_TYPE_ATTRIBUTE)
            .and_then(|tag| tag.parse().ok())
    }

    /// First and last timestamps
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.time.first()?, *self.time.last()?))
    }
}

/// Result of converting one file
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub dialect: Dialect,
    /// Written NetCDF path; `None` in inspect mode
    pub output_path: Option<PathBuf>,
    pub scans: usize,
    pub bins: usize,
    pub metadata_entries: usize,
    pub distribution: SizeDistribution,
    pub processing_time_ms: u128,
}
