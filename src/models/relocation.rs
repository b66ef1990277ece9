use serde::{Deserialize, Serialize};

/// A relocated obstacle and how far it moved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocatedObstacle {
    #[serde(rename = "OBST_ID")]
    pub id: String,

    #[serde(rename = "DISTANCE (m)")]
    pub distance_m: f64,
}

impl RelocatedObstacle {
    pub fn new(id: impl Into<String>, distance_m: f64) -> Self {
        Self {
            id: id.into(),
            distance_m,
        }
    }
}
