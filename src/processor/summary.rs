//! Per-bin summary of a size distribution for quick inspection

use crate::models::SizeDistribution;
use chrono::NaiveDateTime;
use colored::*;
use std::fmt;

/// Mean concentration of one bin across all scans
#[derive(Debug, Clone, PartialEq)]
pub struct BinSummary {
    pub index: usize,
    pub coordinate: f32,
    pub mean_concentration: f32,
}

/// Condensed view of a distribution
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSummary {
    pub scans: usize,
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub bins: Vec<BinSummary>,
    pub attribute_count: usize,
}

impl DistributionSummary {
    pub fn from_distribution(distribution: &SizeDistribution) -> Self {
        let means = distribution.conc.column_nan_means();
        let bins = distribution
            .bin
            .iter()
            .zip(means)
            .enumerate()
            .map(|(index, (&coordinate, mean_concentration))| BinSummary {
                index,
                coordinate,
                mean_concentration,
            })
            .collect();

        Self {
            scans: distribution.time.len(),
            time_range: distribution.time_range(),
            bins,
            attribute_count: distribution.attributes.len(),
        }
    }

    /// Bin with the highest mean concentration, ignoring empty bins
    pub fn peak_bin(&self) -> Option<&BinSummary> {
        self.bins
            .iter()
            .filter(|b| !b.mean_concentration.is_nan())
            .max_by(|a, b| a.mean_concentration.total_cmp(&b.mean_concentration))
    }
}

impl fmt::Display for DistributionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {} {}", "Scans:".bright_cyan(), self.scans)?;
        writeln!(f, "  {} {}", "Bins:".bright_cyan(), self.bins.len())?;
        writeln!(f, "  {} {}", "Attributes:".bright_cyan(), self.attribute_count)?;
        if let Some((start, end)) = self.time_range {
            writeln!(f, "  {} {} .. {}", "Time range:".bright_cyan(), start, end)?;
        }
        writeln!(f, "  {:>5}  {:>12}  {:>14}", "bin", "coordinate", "mean conc")?;
        for bin in &self.bins {
            writeln!(
                f,
                "  {:>5}  {:>12.3}  {:>14.3}",
                bin.index, bin.coordinate, bin.mean_concentration
            )?;
        }
        if let Some(peak) = self.peak_bin() {
            writeln!(
                f,
                "  {} bin {} at {:.3}",
                "Peak:".bright_green(),
                peak.index,
                peak.coordinate
            )?;
        }
        Ok(())
    }
}
