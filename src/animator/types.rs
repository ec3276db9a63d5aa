use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::AnimatorError;
use super::geodesy::{Cartesian3, Quaternion};

pub const SATELLITE_COUNT: usize = 2;

/// One of the two simulated satellites, serialized as 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SatelliteIndex {
    First,
    Second,
}

impl SatelliteIndex {
    pub const ALL: [SatelliteIndex; SATELLITE_COUNT] =
        [SatelliteIndex::First, SatelliteIndex::Second];

    pub fn as_usize(self) -> usize {
        match self {
            SatelliteIndex::First => 0,
            SatelliteIndex::Second => 1,
        }
    }

    /// Id of the rendered model entity.
    pub fn entity_id(self) -> String {
        format!("uax-{}", self.as_usize())
    }

    pub fn from_entity_id(id: &str) -> Option<Self> {
        match id {
            "uax-0" => Some(SatelliteIndex::First),
            "uax-1" => Some(SatelliteIndex::Second),
            _ => None,
        }
    }
}

impl TryFrom<u8> for SatelliteIndex {
    type Error = AnimatorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SatelliteIndex::First),
            1 => Ok(SatelliteIndex::Second),
            other => Err(AnimatorError::InvalidSatellite(other as usize)),
        }
    }
}

impl From<SatelliteIndex> for u8 {
    fn from(value: SatelliteIndex) -> Self {
        value.as_usize() as u8
    }
}

/// Per-satellite kinematic and attitude state, overwritten every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct FlightState {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    /// Radians.
    pub heading: f64,
    /// Radians.
    pub pitch: f64,
    /// Radians.
    pub roll: f64,
    /// `|cos(heading) * cos(pitch)|`, display only.
    pub correction: f64,
    pub speed: f64,
}

impl FlightState {
    pub fn at(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
            heading: 0.0,
            pitch: 0.0,
            roll: 0.0,
            correction: 1.0,
            speed: 1224.0,
        }
    }

    pub fn position(&self) -> Cartesian3 {
        Cartesian3::from_degrees(self.longitude_deg, self.latitude_deg, self.altitude_m)
    }

    /// Sub-satellite point on the ellipsoid.
    pub fn ground_position(&self) -> Cartesian3 {
        Cartesian3::from_degrees(self.longitude_deg, self.latitude_deg, 0.0)
    }
}

/// Transform written to the scene for a satellite model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct EntityTransform {
    pub position: Cartesian3,
    pub orientation: Quaternion,
    pub ground_position: Cartesian3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SensorCone {
    pub origin: Cartesian3,
    pub orientation: Quaternion,
    pub length: f64,
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub visible: bool,
}
