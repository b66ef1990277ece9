use crate::error::{ProcessingError, Result};
use crate::models::RelocatedObstacle;
use crate::processors::filter::{Predicate, RowFilter};
use crate::processors::join::{normalize_identifier, IdentifierIndex};
use crate::processors::statistics::round_to;
use crate::readers::AttributeRow;
use crate::utils::constants::{COL_X, COL_Y, DISTANCE_DECIMALS};
use crate::utils::coordinates::{haversine_distance_m, normalize, planar_distance_m, SecondsScale};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How point geometry is stored in an attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Projected easting/northing in metres
    #[default]
    Planar,
    /// Decimal longitude/latitude
    Geographic,
    /// Packed `DDMMSS[S]` longitude/latitude strings
    Packed,
}

impl FromStr for GeometryKind {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planar" => Ok(GeometryKind::Planar),
            "geographic" => Ok(GeometryKind::Geographic),
            "packed" => Ok(GeometryKind::Packed),
            other => Err(ProcessingError::Config(format!(
                "Unknown geometry '{}'. Expected 'planar', 'geographic' or 'packed'",
                other
            ))),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Planar => "planar",
            GeometryKind::Geographic => "geographic",
            GeometryKind::Packed => "packed",
        };
        write!(f, "{}", name)
    }
}

/// Which columns hold a point and how to read them.
///
/// `x_column` is the easting (or longitude), `y_column` the northing (or latitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryColumns {
    pub kind: GeometryKind,
    pub x_column: String,
    pub y_column: String,
    pub seconds_scale: SecondsScale,
}

impl Default for GeometryColumns {
    fn default() -> Self {
        Self {
            kind: GeometryKind::Planar,
            x_column: COL_X.to_string(),
            y_column: COL_Y.to_string(),
            seconds_scale: SecondsScale::Whole,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

impl GeometryColumns {
    fn position(&self, row: &AttributeRow) -> Result<Position> {
        let (x, y) = match self.kind {
            GeometryKind::Planar | GeometryKind::Geographic => {
                (self.numeric(row, &self.x_column)?, self.numeric(row, &self.y_column)?)
            }
            GeometryKind::Packed => (
                normalize(row.require(&self.x_column)?, self.seconds_scale)?,
                normalize(row.require(&self.y_column)?, self.seconds_scale)?,
            ),
        };
        Ok(Position { x, y })
    }

    fn numeric(&self, row: &AttributeRow, column: &str) -> Result<f64> {
        let raw = row.require(column)?;
        raw.trim().parse::<f64>().map_err(|_| {
            ProcessingError::invalid_record(
                row.line(),
                format!("'{}' is not a number in column '{}'", raw, column),
            )
        })
    }

    fn distance(&self, a: Position, b: Position) -> f64 {
        match self.kind {
            GeometryKind::Planar => planar_distance_m(a.x, a.y, b.x, b.y),
            GeometryKind::Geographic | GeometryKind::Packed => {
                haversine_distance_m(a.y, a.x, b.y, b.x)
            }
        }
    }
}

/// Distances between relocated obstacles and their previous positions
#[derive(Debug, Clone, Default)]
pub struct RelocationDistances {
    pub distances: Vec<RelocatedObstacle>,
    pub relocated: usize,
    pub unmatched: usize,
    pub skipped: usize,
}

pub struct DistanceCalculator {
    id_column: String,
    status: Predicate,
    geometry: GeometryColumns,
}

impl DistanceCalculator {
    pub fn new(id_column: &str, status: Predicate, geometry: GeometryColumns) -> Self {
        Self {
            id_column: id_column.to_string(),
            status,
            geometry,
        }
    }

    /// Pair every current row matching the status with every previous row
    /// of the same identifier and measure the move, rounded to centimetres.
    pub fn calculate(
        &self,
        current: Vec<AttributeRow>,
        previous: Vec<AttributeRow>,
    ) -> RelocationDistances {
        let mut filter = RowFilter::new(self.status.clone());
        let relocated = filter.filter(current);
        let previous = IdentifierIndex::from_rows(previous, &self.id_column);

        let mut result = RelocationDistances {
            relocated: relocated.len(),
            ..Default::default()
        };

        for row in &relocated {
            let (id, here) = match self.identify(row) {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("Skipping relocated obstacle: {}", e);
                    result.skipped += 1;
                    continue;
                }
            };

            let Some(earlier) = previous.get(&id) else {
                tracing::debug!(id = %id, "No previous position");
                result.unmatched += 1;
                continue;
            };

            for old in earlier {
                match self.geometry.position(old) {
                    Ok(there) => {
                        let distance = round_to(self.geometry.distance(here, there), DISTANCE_DECIMALS);
                        tracing::debug!(id = %id, distance, "Measured relocation");
                        result.distances.push(RelocatedObstacle::new(id.clone(), distance));
                    }
                    Err(e) => {
                        tracing::warn!(id = %id, "Skipping previous position: {}", e);
                        result.skipped += 1;
                    }
                }
            }
        }

        result
    }

    fn identify(&self, row: &AttributeRow) -> Result<(String, Position)> {
        let id = row
            .get_trimmed(&self.id_column)
            .map(normalize_identifier)
            .ok_or_else(|| ProcessingError::invalid_record(row.line(), "missing identifier"))?;
        let position = self.geometry.position(row)?;
        Ok((id, position))
    }
}
