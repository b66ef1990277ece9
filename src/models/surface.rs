use serde::{Deserialize, Serialize};
use validator::Validate;

/// An obstacle penetrating a visual surface segment, located in decimal degrees.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SurfaceObstacle {
    #[serde(rename = "Id")]
    pub id: Option<String>,

    #[serde(rename = "ident")]
    pub ident: String,

    #[serde(rename = "Delta")]
    pub delta: Option<String>,

    #[serde(rename = "H(ft)")]
    pub height_ft: Option<String>,

    #[serde(rename = "N")]
    pub north: Option<String>,

    #[serde(rename = "E")]
    pub east: Option<String>,

    #[serde(rename = "Latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[serde(rename = "Longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl SurfaceObstacle {
    pub fn is_located(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
