use chrono::{DateTime, Utc};

use super::geodesy::shortest_angle;
use crate::waypoints::Waypoint;

pub const HEADING_OFFSET_RAD: f64 = 85.0 * std::f64::consts::PI / 180.0;
pub const HEADING_BLEND: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// Bracketing pair for a point in time and the fraction of the way from
/// `p0` to `p1`.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub p0: &'a Waypoint,
    pub p1: &'a Waypoint,
    pub ratio: f64,
}

/// Forward-only search position into a waypoint timeline.
///
/// Holds the index of `p1` from the previous lookup so per-tick searches are
/// amortised O(1) while time advances. Rewinds when time moves backwards.
#[derive(Debug, Clone, Copy)]
pub struct WaypointCursor {
    next: usize,
}

impl Default for WaypointCursor {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl WaypointCursor {
    pub fn reset(&mut self) {
        self.next = 1;
    }

    /// Find the segment containing `elapsed_ms` since `epoch`.
    ///
    /// `p1` is the first waypoint at or beyond `elapsed_ms`. Returns `None`
    /// for timelines shorter than two entries, for times before the first
    /// waypoint and for times past the last one.
    pub fn locate<'a>(
        &mut self,
        waypoints: &'a [Waypoint],
        epoch: DateTime<Utc>,
        elapsed_ms: i64,
    ) -> Option<Segment<'a>> {
        if waypoints.len() < 2 || elapsed_ms < waypoints[0].offset_ms(epoch) {
            return None;
        }

        // Landing exactly on p0 must pick the same segment as a fresh scan.
        if self.next >= waypoints.len() || waypoints[self.next - 1].offset_ms(epoch) >= elapsed_ms
        {
            self.reset();
        }

        while self.next < waypoints.len() && waypoints[self.next].offset_ms(epoch) < elapsed_ms {
            self.next += 1;
        }
        if self.next >= waypoints.len() {
            return None;
        }

        let p0 = &waypoints[self.next - 1];
        let p1 = &waypoints[self.next];
        let span_ms = p1.offset_ms(epoch) - p0.offset_ms(epoch);
        let ratio = if span_ms == 0 {
            1.0
        } else {
            (elapsed_ms - p0.offset_ms(epoch)) as f64 / span_ms as f64
        };

        Some(Segment { p0, p1, ratio })
    }
}

pub fn interpolate(p0: &Waypoint, p1: &Waypoint, ratio: f64) -> GeodeticPoint {
    let lerp = |a: f64, b: f64| a + (b - a) * ratio;
    GeodeticPoint {
        latitude_deg: lerp(p0.lat, p1.lat),
        longitude_deg: lerp(p0.lng, p1.lng),
        altitude_m: lerp(p0.alt, p1.alt),
    }
}

/// Heading along the segment from `p0` to `p1`, offset for the model's
/// forward axis.
pub fn target_heading(p0: &Waypoint, p1: &Waypoint) -> f64 {
    let d_lat = (p1.lat - p0.lat).to_radians();
    let d_lng = (p1.lng - p0.lng).to_radians();
    d_lng.atan2(d_lat) + HEADING_OFFSET_RAD
}

/// One step of the exponential heading filter, along the shortest arc.
pub fn blend_heading(current: f64, target: f64) -> f64 {
    current + shortest_angle(current, target) * HEADING_BLEND
}
