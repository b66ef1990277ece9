//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `OBSTACLE_*` environment variables (`__` separates sections,
//! e.g. `OBSTACLE_SURFACE__PREAMBLE_LINES=38`). CLI arguments are applied
//! last by the command layer.

use crate::error::Result;
use crate::models::ObstacleColumns;
use crate::processors::{GeometryColumns, Predicate};
use crate::utils::constants::*;
use crate::utils::SecondsScale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

pub const ENV_PREFIX: &str = "OBSTACLE";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProcessorConfig {
    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub table_encoding: String,

    #[validate(nested)]
    pub surface: SurfaceConfig,

    #[validate(nested)]
    pub relocation: RelocationConfig,

    #[validate(nested)]
    pub significant: SignificantConfig,

    #[validate(nested)]
    pub unclear: UnclearConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            table_encoding: DEFAULT_TABLE_ENCODING.to_string(),
            surface: SurfaceConfig::default(),
            relocation: RelocationConfig::default(),
            significant: SignificantConfig::default(),
            unclear: UnclearConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(?file, "Configuration loaded");
        Ok(loaded)
    }
}

/// Visual surface segment report
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SurfaceConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,

    #[validate(range(max = 10000))]
    pub preamble_lines: usize,

    #[validate(length(min = 1))]
    pub encoding: String,

    pub seconds_scale: SecondsScale,

    /// Position of the penetration table (IDENT, Delta) among the report tables
    pub ident_table: usize,
    /// Position of the obstacle list table (N, E, H(ft), Id)
    pub obstacle_table: usize,
    pub ident_overflow_column: Option<usize>,
    pub obstacle_overflow_column: Option<usize>,
    /// Tokens without a header column at the start of each obstacle list row
    pub obstacle_leading_tokens: usize,

    #[validate(length(min = 1))]
    pub ident_column: String,
    pub delta_column: String,
    #[validate(length(min = 1))]
    pub id_column: String,
    pub north_column: String,
    pub east_column: String,
    pub height_column: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            encoding: DEFAULT_REPORT_ENCODING.to_string(),
            seconds_scale: SecondsScale::Tenths,
            ident_table: 0,
            obstacle_table: 1,
            ident_overflow_column: Some(2),
            obstacle_overflow_column: Some(6),
            obstacle_leading_tokens: 1,
            ident_column: COL_IDENT.to_string(),
            delta_column: COL_DELTA.to_string(),
            id_column: REPORT_COL_ID.to_string(),
            north_column: REPORT_COL_NORTH.to_string(),
            east_column: REPORT_COL_EAST.to_string(),
            height_column: REPORT_COL_HEIGHT_FT.to_string(),
        }
    }
}

/// Distances moved by relocated obstacles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RelocationConfig {
    pub current: Option<PathBuf>,
    pub previous: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub site: Option<String>,

    #[validate(length(min = 1))]
    pub id_column: String,
    #[validate(length(min = 1))]
    pub status_column: String,
    pub status_value: String,

    pub geometry: GeometryColumns,
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
            output: None,
            site: None,
            id_column: COL_ID.to_string(),
            status_column: COL_PROCEDURE.to_string(),
            status_value: PROCEDURE_RELOCATED.to_string(),
            geometry: GeometryColumns::default(),
        }
    }
}

impl RelocationConfig {
    pub fn status_predicate(&self) -> Predicate {
        Predicate::equals(&self.status_column, &self.status_value)
    }
}

/// Obstacles to be deleted from the registry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignificantConfig {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub table_prefix: String,
    pub table_extension: String,

    #[validate(length(min = 1))]
    pub procedures: Vec<String>,
    pub ready_value: String,

    #[validate(range(min = 0.0))]
    pub min_height_m: f64,

    #[validate(nested)]
    pub columns: ObstacleColumns,
}

impl Default for SignificantConfig {
    fn default() -> Self {
        Self {
            root: None,
            output: None,
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            table_extension: DEFAULT_TABLE_EXTENSION.to_string(),
            procedures: vec![
                PROCEDURE_REMOVE.to_string(),
                PROCEDURE_DISMANTLE.to_string(),
                PROCEDURE_OUT_OF_DATE.to_string(),
            ],
            ready_value: READY_YES.to_string(),
            min_height_m: SIGNIFICANT_MIN_HEIGHT_M,
            columns: ObstacleColumns::default(),
        }
    }
}

impl SignificantConfig {
    pub fn predicate(&self) -> Predicate {
        Predicate::All(vec![
            Predicate::one_of(&self.columns.procedure, &self.procedures),
            Predicate::equals(&self.columns.ready, &self.ready_value),
            Predicate::at_least(&self.columns.height_m, self.min_height_m),
        ])
    }
}

/// Obstacles with an unclear procedure, enriched from the registry table
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UnclearConfig {
    pub obstacles: Option<PathBuf>,
    pub registry: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub site: Option<String>,
    pub status_value: String,

    #[validate(nested)]
    pub columns: ObstacleColumns,

    #[validate(nested)]
    pub registry_columns: ObstacleColumns,
}

impl Default for UnclearConfig {
    fn default() -> Self {
        Self {
            obstacles: None,
            registry: None,
            output: None,
            site: None,
            status_value: PROCEDURE_UNCLEAR.to_string(),
            columns: ObstacleColumns::default(),
            registry_columns: ObstacleColumns::default(),
        }
    }
}

impl UnclearConfig {
    pub fn status_predicate(&self) -> Predicate {
        Predicate::equals(&self.columns.procedure, &self.status_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::GeometryKind;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.surface.preamble_lines, 40);
        assert_eq!(config.surface.seconds_scale, SecondsScale::Tenths);
        assert_eq!(config.surface.obstacle_leading_tokens, 1);
        assert_eq!(config.significant.min_height_m, 100.0);
        assert_eq!(config.relocation.geometry.kind, GeometryKind::Planar);
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            r#"
output_dir = "/tmp/obstacles"

[surface]
preamble_lines = 38
seconds_scale = "whole"
ident_column = "ID"

[relocation]
site = "EF_ACC_SECT_M"

[relocation.geometry]
kind = "packed"
x_column = "COORD_E"
y_column = "COORD_N"

[significant]
min_height_m = 60.0
"#
        )?;

        let config = ProcessorConfig::load(Some(file.path()))?;

        assert_eq!(config.output_dir, PathBuf::from("/tmp/obstacles"));
        assert_eq!(config.surface.preamble_lines, 38);
        assert_eq!(config.surface.seconds_scale, SecondsScale::Whole);
        assert_eq!(config.surface.ident_column, "ID");
        assert_eq!(config.surface.delta_column, "Delta");
        assert_eq!(config.relocation.site.as_deref(), Some("EF_ACC_SECT_M"));
        assert_eq!(config.relocation.geometry.kind, GeometryKind::Packed);
        assert_eq!(config.significant.min_height_m, 60.0);
        assert_eq!(config.significant.procedures.len(), 3);

        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = ProcessorConfig::default();
        config.significant.min_height_m = -1.0;
        assert!(config.validate().is_err());

        let mut config = ProcessorConfig::default();
        config.unclear.columns.procedure.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(ProcessorConfig::load(Some(Path::new("/no/such/config.toml"))).is_err());
    }
}
