use crate::error::{ProcessingError, Result};
use crate::readers::AttributeRow;
use crate::utils::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Procedural action recorded against an obstacle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcedureStatus {
    Relocated,
    Unclear,
    Remove,
    Dismantle,
    OutOfDate,
    Other(String),
}

impl ProcedureStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProcedureStatus::Relocated => PROCEDURE_RELOCATED,
            ProcedureStatus::Unclear => PROCEDURE_UNCLEAR,
            ProcedureStatus::Remove => PROCEDURE_REMOVE,
            ProcedureStatus::Dismantle => PROCEDURE_DISMANTLE,
            ProcedureStatus::OutOfDate => PROCEDURE_OUT_OF_DATE,
            ProcedureStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for ProcedureStatus {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            PROCEDURE_RELOCATED => ProcedureStatus::Relocated,
            PROCEDURE_UNCLEAR | "Epäselvä" => ProcedureStatus::Unclear,
            PROCEDURE_REMOVE => ProcedureStatus::Remove,
            PROCEDURE_DISMANTLE => ProcedureStatus::Dismantle,
            PROCEDURE_OUT_OF_DATE => ProcedureStatus::OutOfDate,
            other => ProcedureStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ProcedureStatus {
    fn from(raw: String) -> Self {
        ProcedureStatus::from(raw.as_str())
    }
}

impl From<ProcedureStatus> for String {
    fn from(status: ProcedureStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProcedureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column names used to read an obstacle from an attribute table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObstacleColumns {
    #[validate(length(min = 1))]
    pub id: String,
    pub obstacle_type: String,
    pub height_m: String,
    pub ready: String,
    pub return_code: String,
    #[validate(length(min = 1))]
    pub procedure: String,
    pub segment: String,
    pub coord_n: String,
    pub coord_e: String,
    pub owner: String,
    pub registry_ref: String,
}

impl Default for ObstacleColumns {
    fn default() -> Self {
        Self {
            id: COL_ID.to_string(),
            obstacle_type: COL_TYPE.to_string(),
            height_m: COL_AGL.to_string(),
            ready: COL_READY.to_string(),
            return_code: COL_RETURN_CODE.to_string(),
            procedure: COL_PROCEDURE.to_string(),
            segment: COL_SEGMENT.to_string(),
            coord_n: COL_COORD_N.to_string(),
            coord_e: COL_COORD_E.to_string(),
            owner: COL_OWNER.to_string(),
            registry_ref: COL_DIAARI.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ObstacleRecord {
    #[validate(length(min = 1))]
    pub id: String,

    pub obstacle_type: Option<String>,

    /// Height above ground in metres
    #[validate(range(min = 0.0))]
    pub height_m: Option<f64>,

    pub ready: Option<String>,
    pub return_code: Option<String>,
    pub procedure: ProcedureStatus,
    pub segment: Option<String>,
    pub coord_n: Option<String>,
    pub coord_e: Option<String>,
    pub owner: Option<String>,
    pub registry_ref: Option<String>,
}

impl ObstacleRecord {
    /// Read an obstacle from a row. Columns absent from the table read as
    /// `None`; only the identifier is required.
    pub fn from_row(row: &AttributeRow, columns: &ObstacleColumns) -> Result<Self> {
        let text = |column: &str| row.get_trimmed(column).map(str::to_string);

        let id = row
            .get_trimmed(&columns.id)
            .map(crate::processors::normalize_identifier)
            .ok_or_else(|| ProcessingError::invalid_record(row.line(), "missing obstacle identifier"))?;

        let height_m = match row.get_trimmed(&columns.height_m) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                ProcessingError::invalid_record(row.line(), format!("invalid height '{}'", raw))
            })?),
            None => None,
        };

        let record = Self {
            id,
            obstacle_type: text(&columns.obstacle_type),
            height_m,
            ready: text(&columns.ready),
            return_code: text(&columns.return_code),
            procedure: ProcedureStatus::from(row.get(&columns.procedure).unwrap_or_default()),
            segment: text(&columns.segment),
            coord_n: text(&columns.coord_n),
            coord_e: text(&columns.coord_e),
            owner: text(&columns.owner),
            registry_ref: text(&columns.registry_ref),
        };

        record.validate().map_err(|e| {
            ProcessingError::invalid_record(row.line(), format!("obstacle {}: {}", record.id, e))
        })?;

        Ok(record)
    }
}

/// Row of the significant-obstacle export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantObstacle {
    #[serde(rename = "OBST_ID")]
    pub id: String,
    #[serde(rename = "TYPE")]
    pub obstacle_type: Option<String>,
    #[serde(rename = "AGL_M_M")]
    pub height_m: Option<f64>,
    #[serde(rename = "READY")]
    pub ready: Option<String>,
    #[serde(rename = "RETURN_CODE")]
    pub return_code: Option<String>,
    #[serde(rename = "PROCEDURE")]
    pub procedure: String,
    #[serde(rename = "SEGMENT")]
    pub segment: Option<String>,
    #[serde(rename = "COORD_N")]
    pub coord_n: Option<String>,
    #[serde(rename = "COORD_E")]
    pub coord_e: Option<String>,
}

impl From<ObstacleRecord> for SignificantObstacle {
    fn from(record: ObstacleRecord) -> Self {
        Self {
            id: record.id,
            obstacle_type: record.obstacle_type,
            height_m: record.height_m,
            ready: record.ready,
            return_code: record.return_code,
            procedure: record.procedure.into(),
            segment: record.segment,
            coord_n: record.coord_n,
            coord_e: record.coord_e,
        }
    }
}

/// Row of the unclear-obstacle export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclearObstacle {
    #[serde(rename = "OBST_ID")]
    pub id: String,
    #[serde(rename = "TYPE")]
    pub obstacle_type: Option<String>,
    #[serde(rename = "AGL_M_M")]
    pub height_m: Option<f64>,
    #[serde(rename = "READY")]
    pub ready: Option<String>,
    #[serde(rename = "RETURN_CODE")]
    pub return_code: Option<String>,
    #[serde(rename = "SEGMENT")]
    pub segment: Option<String>,
    #[serde(rename = "OWNER")]
    pub owner: Option<String>,
    #[serde(rename = "DIAARI")]
    pub registry_ref: Option<String>,
}

impl UnclearObstacle {
    /// Combine an obstacle with the owner and registry reference found for it, if any
    pub fn new(record: &ObstacleRecord, registry: Option<&ObstacleRecord>) -> Self {
        Self {
            id: record.id.clone(),
            obstacle_type: record.obstacle_type.clone(),
            height_m: record.height_m,
            ready: record.ready.clone(),
            return_code: record.return_code.clone(),
            segment: record.segment.clone(),
            owner: registry.and_then(|r| r.owner.clone()),
            registry_ref: registry.and_then(|r| r.registry_ref.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> AttributeRow {
        AttributeRow::from_pairs(2, pairs.iter().copied())
    }

    #[test]
    fn test_procedure_status_parsing() {
        assert_eq!(ProcedureStatus::from("Relocated"), ProcedureStatus::Relocated);
        assert_eq!(ProcedureStatus::from(" Out of date "), ProcedureStatus::OutOfDate);
        assert_eq!(ProcedureStatus::from("Epäselvä"), ProcedureStatus::Unclear);
        assert_eq!(
            ProcedureStatus::from("inspect"),
            ProcedureStatus::Other("inspect".to_string())
        );
        assert_eq!(ProcedureStatus::from("dismantle"), ProcedureStatus::Dismantle);
        assert_eq!(ProcedureStatus::Other("x".into()).to_string(), "x");
    }

    #[test]
    fn test_record_from_row() {
        let record = ObstacleRecord::from_row(
            &row(&[
                ("ID", "00123"),
                ("TYPE", "mast"),
                ("AGL_M_M", "150"),
                ("READY", "yes"),
                ("RETURN_CODE", "4"),
                ("PROCEDURE", "remove"),
                ("SEGMENT", "EFHK"),
            ]),
            &ObstacleColumns::default(),
        )
        .unwrap();

        assert_eq!(record.id, "123");
        assert_eq!(record.height_m, Some(150.0));
        assert_eq!(record.procedure, ProcedureStatus::Remove);
        assert_eq!(record.ready.as_deref(), Some("yes"));
        assert_eq!(record.owner, None);
        assert_eq!(record.coord_n, None);
    }

    #[test]
    fn test_record_validation() {
        let columns = ObstacleColumns::default();

        let negative = ObstacleRecord::from_row(&row(&[("ID", "1"), ("AGL_M_M", "-5")]), &columns);
        assert!(matches!(
            negative,
            Err(ProcessingError::InvalidRecordFormat { line: 2, .. })
        ));

        let garbage = ObstacleRecord::from_row(&row(&[("ID", "1"), ("AGL_M_M", "tall")]), &columns);
        assert!(garbage.is_err());

        let no_id = ObstacleRecord::from_row(&row(&[("ID", " "), ("TYPE", "mast")]), &columns);
        assert!(no_id.is_err());
    }

    #[test]
    fn test_unclear_obstacle_from_records() {
        let columns = ObstacleColumns::default();
        let obstacle = ObstacleRecord::from_row(
            &row(&[("ID", "7"), ("TYPE", "tower"), ("PROCEDURE", "Unclear")]),
            &columns,
        )
        .unwrap();
        let registry = ObstacleRecord::from_row(
            &row(&[("ID", "7"), ("OWNER", "Fingrid"), ("DIAARI", "123/2018")]),
            &columns,
        )
        .unwrap();

        let joined = UnclearObstacle::new(&obstacle, Some(&registry));
        assert_eq!(joined.owner.as_deref(), Some("Fingrid"));
        assert_eq!(joined.registry_ref.as_deref(), Some("123/2018"));

        let alone = UnclearObstacle::new(&obstacle, None);
        assert_eq!(alone.owner, None);
        assert_eq!(alone.obstacle_type.as_deref(), Some("tower"));
    }
}
