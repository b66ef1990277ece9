//! Batch pipelines: read a source, filter or join rows, write a CSV.
//!
//! Each pipeline takes the [`ProcessorConfig`](crate::settings::ProcessorConfig)
//! built for this invocation and reports a [`PipelineOutcome`]. Finding
//! nothing to write is a normal outcome, not an error.

pub mod relocation;
pub mod significant;
pub mod surface;
pub mod unclear;

use crate::error::{ProcessingError, Result};
use crate::processors::DistanceStatistics;
use crate::utils::generate_output_path;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Written {
        path: PathBuf,
        records: usize,
        skipped: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        statistics: Option<DistanceStatistics>,
    },
    NoData {
        reason: String,
    },
}

impl PipelineOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, PipelineOutcome::Written { .. })
    }

    pub fn records(&self) -> usize {
        match self {
            PipelineOutcome::Written { records, .. } => *records,
            PipelineOutcome::NoData { .. } => 0,
        }
    }

    fn no_data(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::info!("{}", reason);
        PipelineOutcome::NoData { reason }
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Written {
                path,
                records,
                skipped,
                statistics,
            } => {
                write!(f, "Wrote {} records to {}", records, path.display())?;
                if *skipped > 0 {
                    write!(f, " ({} rows skipped)", skipped)?;
                }
                if let Some(stats) = statistics {
                    for line in stats.summary_lines() {
                        write!(f, "\n  {}", line)?;
                    }
                }
                Ok(())
            }
            PipelineOutcome::NoData { reason } => write!(f, "No output written: {}", reason),
        }
    }
}

/// Turn an empty result into a no-data outcome; other errors pass through.
fn recover_empty(result: Result<PipelineOutcome>) -> Result<PipelineOutcome> {
    match result {
        Err(ProcessingError::EmptyDataset(reason)) => Ok(PipelineOutcome::no_data(reason)),
        other => other,
    }
}

fn required_path<'a>(path: Option<&'a Path>, setting: &str) -> Result<&'a Path> {
    path.ok_or_else(|| ProcessingError::Config(format!("'{}' is not set", setting)))
}

fn resolve_output(
    explicit: Option<&Path>,
    output_dir: &Path,
    prefix: &str,
    site: Option<&str>,
) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| generate_output_path(Some(output_dir), prefix, site))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display_and_json() {
        let outcome = PipelineOutcome::Written {
            path: PathBuf::from("out/x.csv"),
            records: 3,
            skipped: 1,
            statistics: None,
        };
        assert_eq!(outcome.to_string(), "Wrote 3 records to out/x.csv (1 rows skipped)");
        assert_eq!(outcome.records(), 3);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "written");
        assert!(json.get("statistics").is_none());

        let empty = recover_empty(Err(ProcessingError::EmptyDataset("nothing".into()))).unwrap();
        assert!(!empty.is_written());
        assert_eq!(serde_json::to_value(&empty).unwrap()["status"], "no_data");
    }

    #[test]
    fn test_required_path() {
        assert!(required_path(None, "surface.input").is_err());
        assert!(required_path(Some(Path::new("a.txt")), "surface.input").is_ok());
    }
}
