//! Column resolution for the mSEMS data table
//!
//! Maps a table header row onto the dialect's column groups. Bin groups
//! match by substring, date and time columns by exact name, each trying
//! its candidate spellings in order.

use crate::error::{MsemsError, Result};
use crate::models::DialectProperties;
use csv::StringRecord;
use std::path::Path;
use tracing::debug;

/// A set of columns selected by one candidate substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    /// Candidate that produced the match
    pub pattern: &'static str,
    pub indices: Vec<usize>,
    pub names: Vec<String>,
}

impl ColumnGroup {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Resolved positions of every column the extractor reads
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// `None` when diameters are synthesized
    pub diameter: Option<ColumnGroup>,
    pub concentration: ColumnGroup,
    pub date_index: usize,
    pub time_index: usize,
}

impl ColumnLayout {
    /// Resolve the layout of a header row for the given dialect properties
    pub fn resolve(
        headers: &StringRecord,
        properties: &DialectProperties,
        file_path: &Path,
    ) -> Result<Self> {
        let names: Vec<&str> = headers.iter().map(str::trim).collect();

        let concentration = select_group(&names, properties.concentration_columns)
            .ok_or_else(|| missing_columns(file_path, "concentration", properties.concentration_columns))?;

        let diameter = if properties.diameter_columns.is_empty() {
            None
        } else {
            let group = select_group(&names, properties.diameter_columns).ok_or_else(|| {
                missing_columns(file_path, "diameter", properties.diameter_columns)
            })?;
            Some(group)
        };

        if let Some(diameter) = &diameter {
            if diameter.len() != concentration.len() {
                return Err(MsemsError::ShapeMismatch {
                    path: file_path.to_path_buf(),
                    reason: format!(
                        "{} diameter columns ('{}') but {} concentration columns ('{}')",
                        diameter.len(),
                        diameter.pattern,
                        concentration.len(),
                        concentration.pattern
                    ),
                });
            }
        }

        let date_index = find_exact(&names, properties.date_columns)
            .ok_or_else(|| missing_columns(file_path, "date", properties.date_columns))?;
        let time_index = find_exact(&names, properties.time_columns)
            .ok_or_else(|| missing_columns(file_path, "time", properties.time_columns))?;

        debug!(
            "Column layout: {} concentration columns via '{}', diameter via {:?}, date at {}, time at {}",
            concentration.len(),
            concentration.pattern,
            diameter.as_ref().map(|g| g.pattern),
            date_index,
            time_index
        );

        Ok(Self {
            diameter,
            concentration,
            date_index,
            time_index,
        })
    }

    /// Number of bins in the table
    pub fn bin_count(&self) -> usize {
        self.concentration.len()
    }
}

/// Select every column containing the first candidate that matches anything
fn select_group(names: &[&str], candidates: &[&'static str]) -> Option<ColumnGroup> {
    candidates.iter().find_map(|&pattern| {
        let (indices, matched): (Vec<usize>, Vec<String>) = names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(pattern))
            .map(|(index, name)| (index, name.to_string()))
            .unzip();

        (!indices.is_empty()).then_some(ColumnGroup {
            pattern,
            indices,
            names: matched,
        })
    })
}

/// Index of the first candidate name present exactly in the header
fn find_exact(names: &[&str], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|candidate| names.iter().position(|name| name == candidate))
}

fn missing_columns(file_path: &Path, role: &str, candidates: &[&str]) -> MsemsError {
    MsemsError::UnsupportedLayout {
        path: file_path.to_path_buf(),
        reason: format!(
            "no {} column matching any of [{}]",
            role,
            candidates.join(", ")
        ),
    }
}
