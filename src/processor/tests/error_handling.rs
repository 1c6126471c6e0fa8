//! Error handling integration tests

use super::{header_block, sample_rows, write_scan_file};
use crate::config::ConverterConfig;
use crate::error::MsemsError;
use crate::models::Dialect;
use crate::processor::MsemsConverter;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_nonexistent_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.txt");
    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    match converter.convert(&missing).unwrap_err() {
        MsemsError::FileNotFound { path } => assert_eq!(path, missing),
        other => panic!("Expected FileNotFound error, got {:?}", other),
    }
}

#[test]
fn test_missing_output_directory() {
    let temp_dir = TempDir::new().unwrap();

    let result = MsemsConverter::new(ConverterConfig::with_output_dir(
        temp_dir.path().join("no-such-dir"),
    ));

    match result.unwrap_err() {
        MsemsError::DestinationNotWritable { path, .. } => {
            assert!(path.ends_with("no-such-dir"));
        }
        other => panic!("Expected DestinationNotWritable error, got {:?}", other),
    }
}

#[test]
fn test_output_directory_removed_before_write() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("output");
    fs::create_dir_all(&output_dir).unwrap();
    let input = write_scan_file(
        temp_dir.path(),
        "scan.txt",
        Dialect::UavProcessed,
        &sample_rows(),
    );

    let converter = MsemsConverter::new(ConverterConfig::with_output_dir(&output_dir)).unwrap();
    fs::remove_dir(&output_dir).unwrap();

    let err = converter.convert(&input).unwrap_err();
    assert!(matches!(err, MsemsError::DestinationNotWritable { .. }));
}

#[test]
fn test_unrecognized_file_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("notes.txt");
    fs::write(&input, "#Operator: someone\nplain text\n").unwrap();

    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    match converter.convert(&input).unwrap_err() {
        MsemsError::UnrecognizedFormat { path } => assert_eq!(path, input),
        other => panic!("Expected UnrecognizedFormat error, got {:?}", other),
    }
}

#[test]
fn test_empty_file_is_unrecognized() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("empty.txt");
    fs::write(&input, "").unwrap();

    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    assert!(matches!(
        converter.convert(&input).unwrap_err(),
        MsemsError::UnrecognizedFormat { .. }
    ));
}

#[test]
fn test_unsupported_table_layout() {
    let temp_dir = TempDir::new().unwrap();

    let mut lines = header_block(Dialect::UavProcessed);
    lines.push("#YY/MM/DD\tHR:MN:SC\tdiameter1\tcounts1".to_string());
    lines.push("23/08/07\t10:06:19\t10\t100".to_string());
    let input = temp_dir.path().join("odd_columns.txt");
    fs::write(&input, lines.join("\n")).unwrap();

    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    match converter.convert(&input).unwrap_err() {
        MsemsError::UnsupportedLayout { reason, .. } => {
            assert!(reason.contains("bin_conc"));
            assert!(reason.contains("Bin_Conc"));
        }
        other => panic!("Expected UnsupportedLayout error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("odd_columns.nc").exists());
}

#[test]
fn test_bad_timestamp_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();

    let mut lines = header_block(Dialect::UavProcessed);
    lines.push("#YY/MM/DD\tHR:MN:SC\tbin_dia1\tbin_conc1".to_string());
    lines.push("2023-08-07\t10:06:19\t10\t100".to_string());
    let input = temp_dir.path().join("bad_time.txt");
    fs::write(&input, lines.join("\n")).unwrap();

    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    match converter.convert(&input).unwrap_err() {
        MsemsError::InvalidTimestamp { row, .. } => assert_eq!(row, 0),
        other => panic!("Expected InvalidTimestamp error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("bad_time.nc").exists());
}

#[test]
fn test_dialect_known_when_extraction_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut lines = header_block(Dialect::UavProcessed);
    lines.push("#YY/MM/DD\tHR:MN:SC\tbin_dia1\tbin_conc1".to_string());
    lines.push("23/08/07\tnoon\t10\t100".to_string());
    let input = temp_dir.path().join("late_failure.txt");
    fs::write(&input, lines.join("\n")).unwrap();

    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    let (dialect, metadata) = converter.detect(&input).unwrap();
    assert_eq!(dialect, Dialect::UavProcessed);

    let err = converter
        .convert_detected(&input, dialect, metadata)
        .unwrap_err();
    assert!(matches!(err, MsemsError::InvalidTimestamp { .. }));
}

#[test]
fn test_detect_reports_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let converter =
        MsemsConverter::new(ConverterConfig::with_output_dir(temp_dir.path())).unwrap();

    assert!(matches!(
        converter.detect(&temp_dir.path().join("gone.txt")).unwrap_err(),
        MsemsError::FileNotFound { .. }
    ));
}
