//! mSEMS header scanning and dialect detection.
//!
//! Walks the `#` comment lines of an instrument file once, harvesting
//! `#key: value` metadata and recording which dialect marker phrases
//! appear, in file order.

use crate::constants::{COMMENT_PREFIX, EXCLUDED_METADATA_SUBSTRING, METADATA_SEPARATOR};
use crate::error::{MsemsError, Result};
use crate::models::{Dialect, DialectProperties, Metadata};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Everything learned from one pass over the header lines
#[derive(Debug, Clone, Default)]
pub struct HeaderScan {
    /// Dialect markers in the order they were encountered
    pub candidates: Vec<Dialect>,
    /// 1-based line number of each entry in `candidates`
    pub marker_lines: Vec<usize>,
    pub metadata: Metadata,
    pub lines_scanned: usize,
}

impl HeaderScan {
    /// Dialect of the first marker found in the file
    pub fn primary_dialect(&self) -> Option<Dialect> {
        self.candidates.first().copied()
    }

    /// Whether the header block holds markers of more than one dialect
    ///
    /// Only lines within the primary dialect's fixed header rows count, so
    /// the `#`-prefixed column header row that follows them is ignored.
    pub fn is_ambiguous(&self) -> bool {
        let Some(first) = self.primary_dialect() else {
            return false;
        };
        let header_rows = first.properties().skip_rows;

        self.candidates
            .iter()
            .zip(&self.marker_lines)
            .any(|(dialect, &line)| line <= header_rows && *dialect != first)
    }
}

/// Dialect classification of one input file
#[derive(Debug, Clone)]
pub struct DetectedHeader {
    pub dialect: Dialect,
    pub metadata: Metadata,
}

impl DetectedHeader {
    pub fn properties(&self) -> &'static DialectProperties {
        self.dialect.properties()
    }
}

/// Scan a file's comment lines without deciding on a dialect
pub fn scan_header(file_path: &Path) -> Result<HeaderScan> {
    let file = File::open(file_path).map_err(MsemsError::Io)?;
    let mut reader = BufReader::new(file);

    // Instrument headers may carry Latin-1 symbols such as `µ`
    let mut scanner = HeaderScanner::new();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).map_err(MsemsError::Io)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buffer);
        scanner.scan_line(line.trim_end_matches(['\n', '\r']));
    }

    let scan = scanner.finish();
    debug!(
        "Scanned {} lines of {}: {} metadata entries, markers {:?}",
        scan.lines_scanned,
        file_path.display(),
        scan.metadata.len(),
        scan.candidates
    );
    Ok(scan)
}

/// Classify a file by the first dialect marker in its header
///
/// Later markers of a different dialect are reported but do not change
/// the result.
pub fn detect_dialect(file_path: &Path) -> Result<DetectedHeader> {
    let scan = scan_header(file_path)?;

    let dialect = scan
        .primary_dialect()
        .ok_or_else(|| MsemsError::UnrecognizedFormat {
            path: file_path.to_path_buf(),
        })?;

    if scan.is_ambiguous() {
        warn!(
            "Multiple dialect markers in {} ({:?}); using first: {}",
            file_path.display(),
            scan.candidates,
            dialect
        );
    }

    Ok(DetectedHeader {
        dialect,
        metadata: scan.metadata,
    })
}

/// Line-by-line accumulator for header scanning
struct HeaderScanner {
    scan: HeaderScan,
}

impl HeaderScanner {
    fn new() -> Self {
        Self {
            scan: HeaderScan::default(),
        }
    }

    fn scan_line(&mut self, line: &str) {
        self.scan.lines_scanned += 1;

        if !line.starts_with(COMMENT_PREFIX) {
            return;
        }

        if let Some((key, value)) = parse_metadata_line(line) {
            self.scan.metadata.insert(key, value);
        }

        for dialect in Dialect::MARKER_ORDER {
            if line.contains(dialect.marker()) {
                self.scan.candidates.push(dialect);
                self.scan.marker_lines.push(self.scan.lines_scanned);
            }
        }
    }

    fn finish(self) -> HeaderScan {
        self.scan
    }
}

/// Split a `#key: value` comment line on its first colon
///
/// The key loses its `#` and surrounding whitespace; the value keeps
/// everything after the colon except line terminators.
fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    if line.contains(EXCLUDED_METADATA_SUBSTRING) {
        return None;
    }

    let (key, value) = line.split_once(METADATA_SEPARATOR)?;
    let key = key.trim_matches(COMMENT_PREFIX).trim();
    if key.is_empty() {
        return None;
    }

    let value = value.trim_end_matches(['\n', '\r']);
    Some((key.to_string(), value.to_string()))
}
