/// Report layout
pub const DEFAULT_PREAMBLE_LINES: usize = 40;
pub const RULE_PREFIX: &str = "---";
pub const DEFAULT_REPORT_ENCODING: &str = "windows-1252";
pub const DEFAULT_TABLE_ENCODING: &str = "utf-8";

/// Attribute table column names
pub const COL_ID: &str = "ID";
pub const COL_IDENT: &str = "IDENT";
pub const COL_DELTA: &str = "Delta";
pub const COL_TYPE: &str = "TYPE";
pub const COL_AGL: &str = "AGL_M_M";
pub const COL_READY: &str = "READY";
pub const COL_RETURN_CODE: &str = "RETURN_CODE";
pub const COL_PROCEDURE: &str = "PROCEDURE";
pub const COL_SEGMENT: &str = "SEGMENT";
pub const COL_COORD_N: &str = "COORD_N";
pub const COL_COORD_E: &str = "COORD_E";
pub const COL_OWNER: &str = "OWNER";
pub const COL_DIAARI: &str = "DIAARI";
pub const COL_X: &str = "X";
pub const COL_Y: &str = "Y";

/// Obstacle list columns of the surface segment report
pub const REPORT_COL_NORTH: &str = "N";
pub const REPORT_COL_EAST: &str = "E";
pub const REPORT_COL_HEIGHT_FT: &str = "H(ft)";
pub const REPORT_COL_ID: &str = "Id";

/// Procedure values
pub const PROCEDURE_RELOCATED: &str = "Relocated";
pub const PROCEDURE_UNCLEAR: &str = "Unclear";
pub const PROCEDURE_REMOVE: &str = "remove";
pub const PROCEDURE_DISMANTLE: &str = "dismantle";
pub const PROCEDURE_OUT_OF_DATE: &str = "Out of date";
pub const READY_YES: &str = "yes";

/// Significant obstacle threshold
pub const SIGNIFICANT_MIN_HEIGHT_M: f64 = 100.0;

/// Output file naming
pub const TIMESTAMP_FORMAT: &str = "_%Y%m%d_%H%M";
pub const SURFACE_OUTPUT_PREFIX: &str = "VSS_Point_Coord";
pub const RELOCATION_OUTPUT_PREFIX: &str = "Relocated";
pub const SIGNIFICANT_OUTPUT_PREFIX: &str = "significant_flight_obst";
pub const UNCLEAR_OUTPUT_PREFIX: &str = "Unclear_IDs";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Table discovery defaults
pub const DEFAULT_TABLE_PREFIX: &str = "E";
pub const DEFAULT_TABLE_EXTENSION: &str = "csv";

/// Processing defaults
pub const DISTANCE_DECIMALS: i32 = 2;
