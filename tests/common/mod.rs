//! Shared fixtures for end-to-end tests

use std::fs;
use std::path::{Path, PathBuf};

/// Write a UAV-reader file: 56 comment lines, a column header, and `rows`
///
/// Each row is (date, time, diameters, concentrations).
pub fn write_uav_file(
    dir: &Path,
    name: &str,
    metadata: &[(&str, &str)],
    rows: &[(&str, &str, Vec<f32>, Vec<f32>)],
) -> PathBuf {
    let mut lines = vec!["#UAV Reader Version: 1.2".to_string()];
    lines.extend(metadata.iter().map(|(k, v)| format!("#{}:{}", k, v)));
    while lines.len() < 56 {
        lines.push(format!("#Reserved{:02}: -", lines.len()));
    }

    let bins = rows.first().map_or(0, |r| r.3.len());
    let mut header = vec!["#YY/MM/DD".to_string(), "HR:MN:SC".to_string()];
    header.extend((1..=bins).map(|i| format!("bin_dia{}", i)));
    header.extend((1..=bins).map(|i| format!("bin_conc{}", i)));
    lines.push(header.join("\t"));

    for (date, time, diameters, concentrations) in rows {
        let mut cells = vec![date.to_string(), time.to_string()];
        cells.extend(diameters.iter().map(|d| d.to_string()));
        cells.extend(concentrations.iter().map(|c| c.to_string()));
        lines.push(cells.join("\t"));
    }

    let path = dir.join(name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

/// Write a raw instrument file with `bins` count columns per row
pub fn write_raw_file(dir: &Path, name: &str, rows: &[(&str, &str, Vec<f32>)]) -> PathBuf {
    let mut lines: Vec<String> = (0..55)
        .map(|i| format!("#Parameter{:02}: {}", i, i))
        .collect();

    let bins = rows.first().map_or(0, |r| r.2.len());
    let mut header = vec!["#YY/MM/DD".to_string(), "HR:MN:SC".to_string()];
    header.extend((1..=bins).map(|i| format!("bin{}", i)));
    lines.push(header.join("\t"));

    for (date, time, counts) in rows {
        let mut cells = vec![date.to_string(), time.to_string()];
        cells.extend(counts.iter().map(|c| c.to_string()));
        lines.push(cells.join("\t"));
    }

    let path = dir.join(name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}
