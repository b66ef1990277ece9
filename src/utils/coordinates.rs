use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the digits after `DDMM` in a packed coordinate encode seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondsScale {
    /// `DDMMSS`: seconds as written.
    #[default]
    Whole,
    /// `DDMMSSS`: seconds carry one extra digit and are divided by 10.
    Tenths,
}

impl SecondsScale {
    fn divisor(self) -> f64 {
        match self {
            SecondsScale::Whole => 1.0,
            SecondsScale::Tenths => 10.0,
        }
    }
}

impl FromStr for SecondsScale {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" | "1" => Ok(SecondsScale::Whole),
            "tenths" | "10" => Ok(SecondsScale::Tenths),
            other => Err(ProcessingError::Config(format!(
                "Unknown seconds scale '{}'. Expected 'whole' or 'tenths'",
                other
            ))),
        }
    }
}

impl fmt::Display for SecondsScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondsScale::Whole => write!(f, "whole"),
            SecondsScale::Tenths => write!(f, "tenths"),
        }
    }
}

/// A fixed-width `DDMMSS[S]` coordinate split into its fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedCoordinate {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl PackedCoordinate {
    /// Parse a packed digit string.
    ///
    /// Degrees are the first two digits, minutes the next two, and the
    /// remainder is seconds (divided by 10 for [`SecondsScale::Tenths`]).
    /// An empty remainder reads as zero seconds.
    pub fn parse(packed: &str, scale: SecondsScale) -> Result<Self> {
        let trimmed = packed.trim();

        if trimmed.len() < 4 {
            return Err(ProcessingError::InvalidCoordinateFormat(format!(
                "'{}' is shorter than the 4 digits needed for DDMM",
                packed
            )));
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProcessingError::InvalidCoordinateFormat(format!(
                "'{}' is not a digit string",
                packed
            )));
        }

        // All ASCII digits, so byte slicing stays on char boundaries.
        let degrees = parse_digits(&trimmed[0..2], packed)?;
        let minutes = parse_digits(&trimmed[2..4], packed)?;
        let seconds_raw = &trimmed[4..];
        let seconds = if seconds_raw.is_empty() {
            0.0
        } else {
            seconds_raw.parse::<f64>().map_err(|_| {
                ProcessingError::InvalidCoordinateFormat(format!(
                    "Invalid seconds value in '{}'",
                    packed
                ))
            })? / scale.divisor()
        };

        if !seconds.is_finite() {
            return Err(ProcessingError::InvalidCoordinateFormat(format!(
                "Seconds out of range in '{}'",
                packed
            )));
        }

        Ok(Self {
            degrees,
            minutes,
            seconds,
        })
    }

    pub fn to_decimal(&self) -> f64 {
        self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }
}

fn parse_digits(field: &str, packed: &str) -> Result<u32> {
    field.parse::<u32>().map_err(|_| {
        ProcessingError::InvalidCoordinateFormat(format!("Invalid field '{}' in '{}'", field, packed))
    })
}

/// Convert a packed `DDMMSS[S]` string to decimal degrees
///
/// # Examples
/// ```
/// use obstacle_processor::utils::{normalize, SecondsScale};
///
/// let decimal = normalize("601530", SecondsScale::Tenths).unwrap();
/// assert!((decimal - 60.250833).abs() < 0.000001);
/// ```
pub fn normalize(packed: &str, scale: SecondsScale) -> Result<f64> {
    PackedCoordinate::parse(packed, scale).map(|c| c.to_decimal())
}

/// Format decimal degrees back into the packed form.
///
/// Seconds are rounded to the resolution of the scale: two digits for
/// `Whole`, three for `Tenths`.
pub fn decimal_to_packed(decimal: f64, scale: SecondsScale) -> String {
    let abs_decimal = decimal.abs();
    let mut degrees = abs_decimal.floor() as u32;
    let minutes_decimal = (abs_decimal - degrees as f64) * 60.0;
    let mut minutes = minutes_decimal.floor() as u32;
    let seconds = (minutes_decimal - minutes as f64) * 60.0;

    let (mut scaled, limit) = match scale {
        SecondsScale::Whole => (seconds.round() as u32, 60),
        SecondsScale::Tenths => ((seconds * 10.0).round() as u32, 600),
    };

    if scaled >= limit {
        scaled = 0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes = 0;
        degrees += 1;
    }

    match scale {
        SecondsScale::Whole => format!("{:02}{:02}{:02}", degrees, minutes, scaled),
        SecondsScale::Tenths => format!("{:02}{:02}{:03}", degrees, minutes, scaled),
    }
}

/// Calculate the great-circle distance in metres using the Haversine formula
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Euclidean distance between two projected points, in the units of the projection
pub fn planar_distance_m(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}
