use crate::error::{ProcessingError, Result};
use crate::models::RelocatedObstacle;
use crate::pipelines::{recover_empty, required_path, resolve_output, PipelineOutcome};
use crate::processors::{DistanceCalculator, DistanceStatistics};
use crate::readers::TableReader;
use crate::settings::ProcessorConfig;
use crate::utils::constants::RELOCATION_OUTPUT_PREFIX;
use crate::writers::CsvReportWriter;
use std::io::Write;

pub const HEADER: [&str; 2] = ["OBST_ID", "DISTANCE (m)"];

/// Measure how far relocated obstacles moved between two registry exports
pub fn run(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    recover_empty(run_inner(config))
}

fn run_inner(config: &ProcessorConfig) -> Result<PipelineOutcome> {
    let cfg = &config.relocation;
    let current_path = required_path(cfg.current.as_deref(), "relocation.current")?;
    let previous_path = required_path(cfg.previous.as_deref(), "relocation.previous")?;

    let reader = TableReader::new().with_encoding(&config.table_encoding);
    let current = reader.read_rows(current_path)?;
    let previous = reader.read_rows(previous_path)?;
    tracing::info!(
        current = current.len(),
        previous = previous.len(),
        "Comparing obstacle tables"
    );

    let calculator =
        DistanceCalculator::new(&cfg.id_column, cfg.status_predicate(), cfg.geometry.clone());
    let result = calculator.calculate(current, previous);

    if result.distances.is_empty() {
        return Err(ProcessingError::EmptyDataset(
            "no relocations committed in the area".to_string(),
        ));
    }
    if result.unmatched > 0 {
        tracing::warn!(
            unmatched = result.unmatched,
            "Relocated obstacles without a previous position"
        );
    }

    let values: Vec<f64> = result.distances.iter().map(|d| d.distance_m).collect();
    let statistics = DistanceStatistics::compute(&values)?;

    let site = cfg.site.as_deref();
    let path = resolve_output(cfg.output.as_deref(), &config.output_dir, RELOCATION_OUTPUT_PREFIX, site);
    let mut writer = CsvReportWriter::create(&path)?;
    write_report(&mut writer, site, &result.distances, &statistics)?;
    let records = writer.records_written();
    writer.finish()?;

    tracing::info!(path = %path.display(), records, "Relocation report written");

    Ok(PipelineOutcome::Written {
        path,
        records,
        skipped: result.skipped,
        statistics: Some(statistics),
    })
}

/// Title, table and summary of a relocation report
pub fn write_report<W: Write>(
    writer: &mut CsvReportWriter<W>,
    site: Option<&str>,
    distances: &[RelocatedObstacle],
    statistics: &DistanceStatistics,
) -> Result<()> {
    writer.write_line(&format!(
        "ID's that have been relocated: {}",
        site.unwrap_or_default()
    ))?;
    writer.blank_line()?;
    writer.write_header(&HEADER)?;
    writer.write_records(distances)?;
    writer.blank_line()?;
    for line in statistics.summary_lines() {
        writer.write_line(&line)?;
    }
    Ok(())
}
