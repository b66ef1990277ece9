use crate::error::{ProcessingError, Result};
use crate::models::SurfaceObstacle;
use crate::pipelines::{recover_empty, required_path, resolve_output, PipelineOutcome};
use crate::processors::{left_join, IdentifierIndex};
use crate::readers::{AttributeRow, RawTable, ReportReader, ReportTable};
use crate::settings::{ProcessorConfig, SurfaceConfig};
use crate::utils::constants::SURFACE_OUTPUT_PREFIX;
use crate::utils::normalize;
use crate::writers::write_table;
use validator::Validate;

pub const HEADER: [&str; 8] = ["Id", "ident", "Delta", "H(ft)", "N", "E", "Latitude", "Longitude"];

/// Obstacles located from one report
#[derive(Debug, Clone, Default)]
pub struct LocatedObstacles {
    pub obstacles: Vec<SurfaceObstacle>,
    pub skipped: usize,
}

/// Convert a visual surface segment report into a CSV of obstacle points
pub fn run(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    recover_empty(run_inner(config))
}

fn run_inner(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    let cfg = &config.surface;
    let input = required_path(cfg.input.as_deref(), "surface.input")?;
    tracing::info!(input = %input.display(), "Processing surface segment report");

    let tables = ReportReader::new()
        .with_preamble_lines(cfg.preamble_lines)
        .with_encoding(&cfg.encoding)
        .read_tables(input)?;

    let located = locate_obstacles(tables, cfg)?;
    if located.obstacles.is_empty() {
        return Err(ProcessingError::EmptyDataset(format!(
            "no penetrating obstacles in {}",
            input.display()
        )));
    }

    let unlocated = located.obstacles.iter().filter(|o| !o.is_located()).count();
    if unlocated > 0 {
        tracing::warn!(unlocated, "Obstacles missing from the obstacle list keep blank coordinates");
    }

    let path = resolve_output(cfg.output.as_deref(), &config.output_dir, SURFACE_OUTPUT_PREFIX, None);
    let records = write_table(&path, &HEADER, &located.obstacles)?;
    tracing::info!(path = %path.display(), records, "Surface obstacle points written");

    Ok(PipelineOutcome::Written {
        path,
        records,
        skipped: located.skipped,
        statistics: None,
    })
}

/// Join the penetration table to the obstacle list and locate each obstacle.
///
/// Every penetration row yields one output row; rows with no listed
/// obstacle keep blank coordinates.
pub fn locate_obstacles(mut tables: Vec<RawTable>, cfg: &SurfaceConfig) -> Result<LocatedObstacles> {
    let idents = take_table(&mut tables, cfg.ident_table, "penetration")?
        .into_table(cfg.ident_overflow_column);
    let listed = take_table(&mut tables, cfg.obstacle_table, "obstacle list")?
        .without_leading_tokens(cfg.obstacle_leading_tokens)
        .into_table(cfg.obstacle_overflow_column);

    require_columns(&idents, &[&cfg.ident_column])?;
    require_columns(&listed, &[&cfg.id_column, &cfg.north_column, &cfg.east_column])?;

    let mut located = LocatedObstacles {
        skipped: idents.skipped + listed.skipped,
        ..Default::default()
    };

    let index = IdentifierIndex::from_rows(listed.rows, &cfg.id_column);
    for (left, right) in left_join(idents.rows, &cfg.ident_column, &index) {
        match locate(&left, right, cfg) {
            Ok(obstacle) => located.obstacles.push(obstacle),
            Err(e) => {
                tracing::warn!("Skipping obstacle: {}", e);
                located.skipped += 1;
            }
        }
    }

    Ok(located)
}

fn take_table(tables: &mut [RawTable], position: usize, name: &str) -> Result<RawTable> {
    tables
        .get_mut(position)
        .map(std::mem::take)
        .ok_or_else(|| {
            ProcessingError::EmptyDataset(format!("report has no {} table (table #{})", name, position + 1))
        })
}

fn require_columns(table: &ReportTable, columns: &[&str]) -> Result<()> {
    for column in columns {
        if !table.header.iter().any(|h| h == column) {
            return Err(ProcessingError::MissingColumn(format!(
                "'{}' not in report header {:?}",
                column, table.header
            )));
        }
    }
    Ok(())
}

fn locate(left: &AttributeRow, right: Option<&AttributeRow>, cfg: &SurfaceConfig) -> Result<SurfaceObstacle> {
    let text = |row: Option<&AttributeRow>, column: &str| {
        row.and_then(|r| r.get_trimmed(column)).map(str::to_string)
    };

    let ident = left
        .get_trimmed(&cfg.ident_column)
        .ok_or_else(|| ProcessingError::invalid_record(left.line(), "missing ident"))?
        .to_string();

    let north = text(right, &cfg.north_column);
    let east = text(right, &cfg.east_column);
    let latitude = north.as_deref().map(|n| normalize(n, cfg.seconds_scale)).transpose()?;
    let longitude = east.as_deref().map(|e| normalize(e, cfg.seconds_scale)).transpose()?;

    let obstacle = SurfaceObstacle {
        id: text(right, &cfg.id_column),
        ident,
        delta: text(Some(left), &cfg.delta_column),
        height_ft: text(right, &cfg.height_column),
        north,
        east,
        latitude,
        longitude,
    };

    obstacle.validate().map_err(|e| {
        ProcessingError::InvalidCoordinateFormat(format!("obstacle {}: {}", obstacle.ident, e))
    })?;

    Ok(obstacle)
}
