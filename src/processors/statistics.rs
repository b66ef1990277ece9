use crate::error::{ProcessingError, Result};
use serde::Serialize;

/// Summary statistics over a set of distances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceStatistics {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl DistanceStatistics {
    /// Compute the statistics; an empty input is [`ProcessingError::EmptyDataset`].
    ///
    /// Non-finite values are ignored.
    pub fn compute(values: &[f64]) -> Result<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        if sorted.is_empty() {
            return Err(ProcessingError::EmptyDataset(
                "no values to summarise".to_string(),
            ));
        }

        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Ok(Self {
            count,
            sum,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            median,
        })
    }

    /// Summary lines in the layout of the relocation report
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Total amount of relocated flight obstacles:   {}",
                self.count
            ),
            format!("Total amount of distance in meters:   {}", round_to(self.sum, 2)),
            format!("Shortest relocation (m):   {}", self.min),
            format!("Biggest relocation (m):   {}", self.max),
            format!("Mean:   {}", round_to(self.mean, 2)),
            format!("Median:   {}", self.median),
        ]
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
