//! Error handling for mSEMS conversion operations.
//!
//! Provides error types with file context for dialect detection,
//! table extraction, and NetCDF output failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsemsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unrecognized file format: no raw, igor or uav marker found in {path}")]
    UnrecognizedFormat { path: PathBuf },

    #[error("Unsupported table layout in file: {path} - {reason}")]
    UnsupportedLayout { path: PathBuf, reason: String },

    #[error("Invalid timestamp '{value}' in {path} at data row {row}")]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid value '{value}' in column '{column}' of {path} at data row {row}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Shape mismatch in file: {path} - {reason}")]
    ShapeMismatch { path: PathBuf, reason: String },

    #[error("Destination not writable: {path} - {reason}")]
    DestinationNotWritable { path: PathBuf, reason: String },

    #[error("Invalid NetCDF output: {path} - {reason}")]
    InvalidOutput { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, MsemsError>;
