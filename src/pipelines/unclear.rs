use crate::error::{ProcessingError, Result};
use crate::models::{ObstacleColumns, ObstacleRecord, UnclearObstacle};
use crate::pipelines::{recover_empty, required_path, resolve_output, PipelineOutcome};
use crate::processors::{IdentifierIndex, Predicate, RowFilter};
use crate::readers::{AttributeRow, TableReader};
use crate::settings::ProcessorConfig;
use crate::utils::constants::UNCLEAR_OUTPUT_PREFIX;
use crate::writers::write_table;

pub const HEADER: [&str; 8] = [
    "OBST_ID",
    "TYPE",
    "AGL_M_M",
    "READY",
    "RETURN_CODE",
    "SEGMENT",
    "OWNER",
    "DIAARI",
];

/// List obstacles with an unclear procedure, with owner and registry
/// reference looked up from the registry table
pub fn run(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    recover_empty(run_inner(config))
}

fn run_inner(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    let cfg = &config.unclear;
    let obstacles_path = required_path(cfg.obstacles.as_deref(), "unclear.obstacles")?;
    let registry_path = required_path(cfg.registry.as_deref(), "unclear.registry")?;

    let reader = TableReader::new().with_encoding(&config.table_encoding);
    let obstacles = reader.read_rows(obstacles_path)?;

    let mut skipped = 0;
    let unclear = index_unclear(obstacles, &cfg.status_predicate(), &cfg.columns, &mut skipped);
    if unclear.is_empty() {
        return Err(ProcessingError::EmptyDataset(
            "no obstacles with an unclear procedure".to_string(),
        ));
    }
    tracing::info!(
        ids = unclear.len(),
        records = unclear.value_count(),
        "Unclear obstacles found"
    );

    let registry_rows = reader.read_rows(registry_path)?;
    let registry = index_registry(registry_rows, &unclear, &cfg.registry_columns, &mut skipped);
    let rows = enrich(&unclear, &registry);

    let site = cfg.site.as_deref();
    let path = resolve_output(cfg.output.as_deref(), &config.output_dir, UNCLEAR_OUTPUT_PREFIX, site);
    let records = write_table(&path, &HEADER, &rows)?;
    tracing::info!(path = %path.display(), records, "Unclear obstacles written");

    Ok(PipelineOutcome::Written {
        path,
        records,
        skipped,
        statistics: None,
    })
}

/// Group the obstacles matching `status` by identifier. An identifier seen
/// more than once keeps every record, in input order.
pub fn index_unclear(
    rows: Vec<AttributeRow>,
    status: &Predicate,
    columns: &ObstacleColumns,
    skipped: &mut usize,
) -> IdentifierIndex<ObstacleRecord> {
    let mut filter = RowFilter::new(status.clone());
    let mut index = IdentifierIndex::new();

    for row in filter.filter(rows) {
        match ObstacleRecord::from_row(&row, columns) {
            Ok(record) => {
                let id = record.id.clone();
                index.insert_or_append(&id, record);
            }
            Err(e) => {
                tracing::warn!("Skipping obstacle: {}", e);
                *skipped += 1;
            }
        }
    }

    index
}

/// Registry records for the identifiers in `wanted` only
pub fn index_registry(
    rows: Vec<AttributeRow>,
    wanted: &IdentifierIndex<ObstacleRecord>,
    columns: &ObstacleColumns,
    skipped: &mut usize,
) -> IdentifierIndex<ObstacleRecord> {
    let mut index = IdentifierIndex::new();

    for row in rows {
        let Some(id) = row.get_trimmed(&columns.id) else {
            continue;
        };
        if !wanted.contains(id) {
            continue;
        }
        match ObstacleRecord::from_row(&row, columns) {
            Ok(record) => {
                let id = record.id.clone();
                index.insert_or_append(&id, record);
            }
            Err(e) => {
                tracing::warn!("Skipping registry entry: {}", e);
                *skipped += 1;
            }
        }
    }

    index
}

/// One output row per unclear record, joined to the first registry entry
pub fn enrich(
    unclear: &IdentifierIndex<ObstacleRecord>,
    registry: &IdentifierIndex<ObstacleRecord>,
) -> Vec<UnclearObstacle> {
    unclear
        .iter()
        .flat_map(|(id, records)| {
            let entry = registry.first(id);
            if entry.is_none() {
                tracing::debug!(id = %id, "No registry entry");
            }
            records.iter().map(move |record| UnclearObstacle::new(record, entry))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::UnclearConfig;
    use pretty_assertions::assert_eq;

    fn obstacle(id: &str, procedure: &str, segment: &str) -> AttributeRow {
        AttributeRow::from_pairs(
            2,
            [
                ("ID", id),
                ("TYPE", "mast"),
                ("AGL_M_M", "45"),
                ("PROCEDURE", procedure),
                ("SEGMENT", segment),
            ],
        )
    }

    fn registry(id: &str, owner: &str, diaari: &str) -> AttributeRow {
        AttributeRow::from_pairs(2, [("ID", id), ("OWNER", owner), ("DIAARI", diaari)])
    }

    #[test]
    fn test_unclear_join() {
        let cfg = UnclearConfig::default();
        let mut skipped = 0;

        let unclear = index_unclear(
            vec![
                obstacle("10", "Unclear", "A"),
                obstacle("11", "Relocated", "B"),
                obstacle("12", "Unclear", "C"),
                obstacle("10.0", "Unclear", "D"),
            ],
            &cfg.status_predicate(),
            &cfg.columns,
            &mut skipped,
        );
        assert_eq!(unclear.len(), 2);
        assert_eq!(unclear.value_count(), 3);

        let registry = index_registry(
            vec![
                registry("0010", "Fingrid", "1/2019"),
                registry("10", "Elisa", "2/2019"),
                registry("11", "DNA", "3/2019"),
            ],
            &unclear,
            &cfg.registry_columns,
            &mut skipped,
        );
        assert_eq!(registry.len(), 1);

        let rows = enrich(&unclear, &registry);
        assert_eq!(rows.len(), 3);
        assert_eq!(skipped, 0);

        assert_eq!(rows[0].id, "10");
        assert_eq!(rows[0].segment.as_deref(), Some("A"));
        assert_eq!(rows[0].owner.as_deref(), Some("Fingrid"));
        assert_eq!(rows[1].id, "10");
        assert_eq!(rows[1].segment.as_deref(), Some("D"));
        assert_eq!(rows[1].registry_ref.as_deref(), Some("1/2019"));
        assert_eq!(rows[2].id, "12");
        assert_eq!(rows[2].owner, None);
    }

    #[test]
    fn test_no_unclear_obstacles() {
        let cfg = UnclearConfig::default();
        let mut skipped = 0;
        let unclear = index_unclear(
            vec![obstacle("1", "Relocated", "A")],
            &cfg.status_predicate(),
            &cfg.columns,
            &mut skipped,
        );
        assert!(unclear.is_empty());
    }
}
