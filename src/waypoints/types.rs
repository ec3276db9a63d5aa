use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A timestamped geodetic point on a satellite's intended path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Waypoint {
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

impl Waypoint {
    /// Milliseconds from `epoch` to this waypoint.
    pub fn offset_ms(&self, epoch: DateTime<Utc>) -> i64 {
        (self.time - epoch).num_milliseconds()
    }
}
