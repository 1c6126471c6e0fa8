//! Application constants for the mSEMS processor
//!
//! Marker phrases, per-dialect column candidates, and the fixed names used
//! in the NetCDF output.

// =============================================================================
// Header Scanning
// =============================================================================

/// Marker phrase identifying a UAV-reader-processed file
pub const UAV_MARKER: &str = "#UAV Reader Version";

/// Marker phrase identifying an Igor-processed file
pub const IGOR_MARKER: &str = "#Date";

/// Marker phrase identifying a raw instrument file
pub const RAW_MARKER: &str = "#YY/MM/DD";

/// Prefix of every header/comment line
pub const COMMENT_PREFIX: char = '#';

/// Separator between key and value in `#key: value` metadata lines
pub const METADATA_SEPARATOR: char = ':';

/// Comment lines containing this substring are never harvested as metadata
pub const EXCLUDED_METADATA_SUBSTRING: &str = "scan_direction";

// =============================================================================
// Table Layout
// =============================================================================

/// Header rows preceding the column header in raw files
pub const RAW_SKIP_ROWS: usize = 55;

/// Header rows preceding the column header in processed files
pub const PROCESSED_SKIP_ROWS: usize = 56;

/// Field delimiter shared by all dialects
pub const TAB_DELIMITER: u8 = b'\t';

/// Date column spellings, UAV/raw convention first
pub const YMD_DATE_COLUMN: &str = "#YY/MM/DD";
pub const IGOR_DATE_COLUMN: &str = "#Date";

/// Time column spellings
pub const HMS_TIME_COLUMN: &str = "HR:MN:SC";
pub const IGOR_TIME_COLUMN: &str = "Time";

/// Separator joining the date and time cells before parsing
pub const DATETIME_JOIN: &str = "T";

/// Pattern for the joined date/time text, e.g. `23/08/07T10:06:19`
pub const DATETIME_FORMAT: &str = "%y/%m/%dT%H:%M:%S";

// =============================================================================
// NetCDF Output
// =============================================================================

/// Extension of written files
pub const OUTPUT_EXTENSION: &str = "nc";

/// Data variable name
pub const CONC_VARIABLE: &str = "conc";

/// Time dimension and coordinate variable name
pub const TIME_DIMENSION: &str = "time";

/// Bin dimension and coordinate variable name
pub const BIN_DIMENSION: &str = "bin";

/// Global attribute carrying the detected dialect tag
pub const FILE_TYPE_ATTRIBUTE: &str = "file_type";

/// Time coordinate units (CF-conventions)
pub const TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";

/// Time coordinate calendar
pub const TIME_CALENDAR: &str = "standard";

/// Bin coordinate units for measured diameters
pub const DIAMETER_UNITS: &str = "nm";

/// Bin coordinate units for the synthesized raw bin index
pub const BIN_INDEX_UNITS: &str = "1";

/// Concentration units
pub const CONC_UNITS: &str = "cm-3";

/// Units of the uninverted per-bin values in raw files
pub const RAW_COUNT_UNITS: &str = "counts";
