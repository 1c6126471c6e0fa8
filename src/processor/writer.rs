//! NetCDF writing module for mSEMS size distributions
//!
//! Reshapes an extracted table into a (time, bin) grid with coordinates and
//! global attributes, persists it as `<output_dir>/<base_name>.nc`, and reads
//! such files back.

use crate::constants::{
    BIN_DIMENSION, BIN_INDEX_UNITS, CONC_UNITS, CONC_VARIABLE, DIAMETER_UNITS,
    FILE_TYPE_ATTRIBUTE, OUTPUT_EXTENSION, RAW_COUNT_UNITS, TIME_CALENDAR, TIME_DIMENSION,
    TIME_UNITS,
};
use crate::error::{MsemsError, Result};
use crate::models::{BinDiameters, Dialect, ExtractedTable, Grid, Metadata, SizeDistribution};
use chrono::{DateTime, NaiveDateTime};
use netcdf::AttributeValue;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Assemble the output array from an extracted table
///
/// Per-scan diameters are collapsed to their column-wise mean. Metadata
/// keys are sanitized for NetCDF and `file_type` is set to the dialect tag.
pub fn build_distribution(
    table: ExtractedTable,
    metadata: &Metadata,
    dialect: Dialect,
) -> SizeDistribution {
    let bin = table.diameters.bin_axis();
    if matches!(table.diameters, BinDiameters::PerScan(_)) {
        debug!(
            "Collapsed per-scan diameters of {} scans to their mean bin axis",
            table.concentrations.rows()
        );
    }

    let mut attributes = Metadata::new();
    for (key, value) in metadata {
        match sanitize_attribute_name(key) {
            Some(name) => {
                if name != *key {
                    debug!("Renamed metadata key '{}' to '{}'", key.escape_debug(), name);
                }
                if let Some(previous) = attributes.insert(name.clone(), value.clone()) {
                    warn!(
                        "Metadata key '{}' collides with an earlier key as '{}'; replacing '{}'",
                        key.escape_debug(),
                        name,
                        previous.escape_debug()
                    );
                }
            }
            None => warn!("Dropping metadata key with no usable name: '{}'", key.escape_debug()),
        }
    }
    attributes.insert(FILE_TYPE_ATTRIBUTE.to_string(), dialect.tag().to_string());

    SizeDistribution {
        time: table.timestamps,
        bin,
        conc: table.concentrations,
        attributes,
    }
}

/// Output base name: the final path segment cut at its first `.`
pub fn output_base_name(source_file: &Path) -> String {
    let file_name = source_file
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

/// Rewrite a metadata key into a legal NetCDF attribute name
///
/// `/` and control characters become `_`, trailing whitespace is dropped,
/// and names must start with an alphanumeric character or `_`.
pub fn sanitize_attribute_name(key: &str) -> Option<String> {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|c| if c == '/' || c.is_control() { '_' } else { c })
        .collect();

    let first = cleaned.chars().next()?;
    if first.is_alphanumeric() || first == '_' {
        Some(cleaned)
    } else {
        Some(format!("_{}", cleaned))
    }
}

/// NetCDF writer for size distributions
#[derive(Debug, Clone)]
pub struct NetCdfWriter {
    output_dir: PathBuf,
    overwrite: bool,
}

impl NetCdfWriter {
    /// Create a writer targeting an existing directory
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            overwrite: true,
        }
    }

    /// Allow or refuse replacing an existing output file
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Destination path for a given source file
    pub fn output_path(&self, source_file: &Path) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", output_base_name(source_file), OUTPUT_EXTENSION))
    }

    /// Write a distribution next to the other outputs, named after its source
    pub fn write(&self, distribution: &SizeDistribution, source_file: &Path) -> Result<PathBuf> {
        let output_path = self.output_path(source_file);
        self.check_destination(&output_path)?;

        let n_time = distribution.time.len();
        let n_bin = distribution.bin.len();
        if distribution.conc.shape() != (n_time, n_bin) {
            return Err(MsemsError::ShapeMismatch {
                path: output_path,
                reason: format!(
                    "conc grid is {:?} but coordinates are ({}, {})",
                    distribution.conc.shape(),
                    n_time,
                    n_bin
                ),
            });
        }

        let mut file = netcdf::create(&output_path).map_err(|e| {
            MsemsError::DestinationNotWritable {
                path: output_path.clone(),
                reason: e.to_string(),
            }
        })?;

        file.add_dimension(TIME_DIMENSION, n_time)?;
        file.add_dimension(BIN_DIMENSION, n_bin)?;

        // Time coordinate
        {
            let seconds: Vec<f64> = distribution
                .time
                .iter()
                .map(|t| t.and_utc().timestamp() as f64)
                .collect();
            let mut time_var = file.add_variable::<f64>(TIME_DIMENSION, &[TIME_DIMENSION])?;
            time_var.put_attribute("standard_name", "time")?;
            time_var.put_attribute("long_name", "scan start time")?;
            time_var.put_attribute("units", TIME_UNITS)?;
            time_var.put_attribute("calendar", TIME_CALENDAR)?;
            if !seconds.is_empty() {
                time_var.put_values(&seconds, ..)?;
            }
        }

        // Raw files hold per-bin counts over a bin index, not inverted diameters
        let measured = distribution
            .file_type()
            .is_none_or(|dialect| dialect.has_measured_diameters());

        // Bin coordinate
        {
            let mut bin_var = file.add_variable::<f32>(BIN_DIMENSION, &[BIN_DIMENSION])?;
            if measured {
                bin_var.put_attribute("long_name", "mean particle mobility diameter")?;
                bin_var.put_attribute("units", DIAMETER_UNITS)?;
            } else {
                bin_var.put_attribute("long_name", "size bin index")?;
                bin_var.put_attribute("units", BIN_INDEX_UNITS)?;
            }
            if !distribution.bin.is_empty() {
                bin_var.put_values(&distribution.bin, ..)?;
            }
        }

        // Concentration grid
        {
            let mut conc_var =
                file.add_variable::<f32>(CONC_VARIABLE, &[TIME_DIMENSION, BIN_DIMENSION])?;
            if measured {
                conc_var.put_attribute("long_name", "particle number concentration")?;
                conc_var.put_attribute("units", CONC_UNITS)?;
            } else {
                conc_var.put_attribute("long_name", "raw particle counts per bin")?;
                conc_var.put_attribute("units", RAW_COUNT_UNITS)?;
            }
            if !distribution.conc.values().is_empty() {
                conc_var.put_values(distribution.conc.values(), ..)?;
            }
        }

        for (name, value) in &distribution.attributes {
            file.add_attribute(name, value.as_str())?;
        }

        debug!(
            "Wrote {} scans x {} bins with {} attributes to {}",
            n_time,
            n_bin,
            distribution.attributes.len(),
            output_path.display()
        );

        Ok(output_path)
    }

    fn check_destination(&self, output_path: &Path) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(MsemsError::DestinationNotWritable {
                path: self.output_dir.clone(),
                reason: "output directory does not exist".to_string(),
            });
        }

        if !self.overwrite && output_path.exists() {
            return Err(MsemsError::DestinationNotWritable {
                path: output_path.to_path_buf(),
                reason: "file exists and overwriting is disabled".to_string(),
            });
        }

        Ok(())
    }
}

/// Read a size distribution written by [`NetCdfWriter`]
///
/// Only text global attributes are returned.
pub fn read_size_distribution(path: &Path) -> Result<SizeDistribution> {
    let file = netcdf::open(path)?;

    let n_time = dimension_len(&file, TIME_DIMENSION, path)?;
    let n_bin = dimension_len(&file, BIN_DIMENSION, path)?;

    let time_var = variable(&file, TIME_DIMENSION, path)?;
    let seconds: Vec<f64> = if n_time == 0 {
        Vec::new()
    } else {
        time_var.get_values(..)?
    };
    check_len(TIME_DIMENSION, seconds.len(), n_time, path)?;
    let time = seconds
        .iter()
        .map(|&s| seconds_to_datetime(s, path))
        .collect::<Result<Vec<_>>>()?;

    let bin_var = variable(&file, BIN_DIMENSION, path)?;
    let bin: Vec<f32> = if n_bin == 0 {
        Vec::new()
    } else {
        bin_var.get_values(..)?
    };
    check_len(BIN_DIMENSION, bin.len(), n_bin, path)?;

    let conc_var = variable(&file, CONC_VARIABLE, path)?;
    let values: Vec<f32> = if n_time * n_bin == 0 {
        Vec::new()
    } else {
        conc_var.get_values(..)?
    };
    let conc = Grid::new(n_time, n_bin, values).ok_or_else(|| MsemsError::InvalidOutput {
        path: path.to_path_buf(),
        reason: format!("conc does not hold {}x{} values", n_time, n_bin),
    })?;

    let mut attributes = Metadata::new();
    for attr in file.attributes() {
        match attr.value()? {
            AttributeValue::Str(value) => {
                attributes.insert(attr.name().to_string(), value);
            }
            _ => debug!("Skipping non-text attribute '{}'", attr.name()),
        }
    }

    Ok(SizeDistribution {
        time,
        bin,
        conc,
        attributes,
    })
}

fn dimension_len(file: &netcdf::File, name: &str, path: &Path) -> Result<usize> {
    file.dimension(name)
        .map(|dim| dim.len())
        .ok_or_else(|| MsemsError::InvalidOutput {
            path: path.to_path_buf(),
            reason: format!("missing dimension '{}'", name),
        })
}

fn variable<'f>(file: &'f netcdf::File, name: &str, path: &Path) -> Result<netcdf::Variable<'f>> {
    file.variable(name).ok_or_else(|| MsemsError::InvalidOutput {
        path: path.to_path_buf(),
        reason: format!("missing variable '{}'", name),
    })
}

fn check_len(name: &str, found: usize, expected: usize, path: &Path) -> Result<()> {
    if found != expected {
        return Err(MsemsError::InvalidOutput {
            path: path.to_path_buf(),
            reason: format!(
                "variable '{}' holds {} values, expected {}",
                name, found, expected
            ),
        });
    }
    Ok(())
}

fn seconds_to_datetime(seconds: f64, path: &Path) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| MsemsError::InvalidOutput {
            path: path.to_path_buf(),
            reason: format!("time value {} out of range", seconds),
        })
}
