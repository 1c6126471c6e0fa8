//! mSEMS Processor Library
//!
//! Converts scan files from an mSEMS aerosol spectrometer into NetCDF size
//! distributions.
//!
//! Three input dialects are supported:
//! - raw instrument output (bin counts with no diameters)
//! - files inverted by the Igor toolkit
//! - files inverted by the UAV reader
//!
//! Each file passes through dialect detection, table extraction, and a
//! (time, bin) NetCDF writer that carries the header metadata as global
//! attributes.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;

pub use config::ConverterConfig;
pub use error::{MsemsError, Result};
pub use header::{DetectedHeader, HeaderScan, detect_dialect, scan_header};
pub use models::{
    BinDiameters, ConversionOutcome, Dialect, DialectProperties, ExtractedTable, Grid, Metadata,
    SizeDistribution,
};
pub use processor::MsemsConverter;
pub use processor::extract::extract_table;
pub use processor::writer::{NetCdfWriter, build_distribution, read_size_distribution};

use std::path::Path;

/// Convert one file into `<output_dir>/<base_name>.nc` with default settings
pub fn convert_file(file_path: &Path, output_dir: &Path) -> Result<ConversionOutcome> {
    MsemsConverter::new(ConverterConfig::with_output_dir(output_dir))?.convert(file_path)
}
