use crate::error::{ProcessingError, Result};
use crate::models::{ObstacleColumns, ObstacleRecord, SignificantObstacle};
use crate::pipelines::{recover_empty, required_path, resolve_output, PipelineOutcome};
use crate::processors::RowFilter;
use crate::readers::{discover_tables, AttributeRow, TableReader};
use crate::settings::ProcessorConfig;
use crate::utils::constants::SIGNIFICANT_OUTPUT_PREFIX;
use crate::utils::ProgressReporter;
use crate::writers::write_table;
use std::path::Path;

pub const HEADER: [&str; 9] = [
    "OBST_ID",
    "TYPE",
    "AGL_M_M",
    "READY",
    "RETURN_CODE",
    "PROCEDURE",
    "SEGMENT",
    "COORD_N",
    "COORD_E",
];

/// Collect ready obstacles at or above the height threshold whose procedure
/// deletes them from the registry, across every export under the root.
pub fn run(config: &ProcessorConfig, silent: bool) -> Result<PipelineOutcome> {
    recover_empty(run_inner(config, silent))
}

fn run_inner(config: &ProcessorConfig, silent: bool) -> Result<PipelineOutcome> {
    let cfg = &config.significant;
    let root = required_path(cfg.root.as_deref(), "significant.root")?;

    let tables = discover_tables(root, &cfg.table_prefix, &cfg.table_extension)?;
    if tables.is_empty() {
        return Err(ProcessingError::EmptyDataset(format!(
            "no '{}*.{}' tables under {}",
            cfg.table_prefix,
            cfg.table_extension,
            root.display()
        )));
    }
    tracing::info!(tables = tables.len(), root = %root.display(), "Scanning obstacle tables");

    let reader = TableReader::new().with_encoding(&config.table_encoding);
    let progress = ProgressReporter::new(tables.len() as u64, "Reading obstacle tables", silent);
    let mut filter = RowFilter::new(cfg.predicate());
    let mut obstacles = Vec::new();
    let mut skipped = 0;

    for path in &tables {
        progress.set_message(&format!("Reading {}", file_label(path)));
        match reader.read_rows(path) {
            Ok(rows) => {
                let selected = select(&mut filter, rows, &cfg.columns);
                skipped += selected.skipped;
                tracing::debug!(
                    path = %path.display(),
                    selected = selected.obstacles.len(),
                    "Table filtered"
                );
                obstacles.extend(selected.obstacles);
            }
            Err(e @ ProcessingError::SourceUnavailable { .. }) => {
                tracing::warn!("Skipping table: {}", e);
            }
            Err(e) => return Err(e),
        }
        progress.increment(1);
    }
    progress.finish_with_message(&format!("Found {} significant obstacles", obstacles.len()));

    if obstacles.is_empty() {
        return Err(ProcessingError::EmptyDataset(
            "no significant obstacles to delete".to_string(),
        ));
    }

    let path = resolve_output(cfg.output.as_deref(), &config.output_dir, SIGNIFICANT_OUTPUT_PREFIX, None);
    let records = write_table(&path, &HEADER, &obstacles)?;
    tracing::info!(path = %path.display(), records, "Significant obstacles written");

    Ok(PipelineOutcome::Written {
        path,
        records,
        skipped,
        statistics: None,
    })
}

pub struct Selection {
    pub obstacles: Vec<SignificantObstacle>,
    pub skipped: usize,
}

/// Keep the rows accepted by `filter` and convert them to output records
pub fn select(filter: &mut RowFilter, rows: Vec<AttributeRow>, columns: &ObstacleColumns) -> Selection {
    let mut selection = Selection {
        obstacles: Vec::new(),
        skipped: 0,
    };

    for row in filter.filter(rows) {
        match ObstacleRecord::from_row(&row, columns) {
            Ok(record) => selection.obstacles.push(record.into()),
            Err(e) => {
                tracing::warn!("Skipping obstacle: {}", e);
                selection.skipped += 1;
            }
        }
    }

    selection
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
