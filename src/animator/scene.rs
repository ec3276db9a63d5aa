use serde::Serialize;
use utoipa::ToSchema;

use super::geodesy::Cartesian3;
use super::types::{EntityTransform, SatelliteIndex, SATELLITE_COUNT};

pub const CAMERA_FLIGHT_SECONDS: f64 = 1.5;

/// Renderer-side consumer of entity transforms.
pub trait SceneSink {
    fn update_satellite(&mut self, index: SatelliteIndex, transform: EntityTransform);
    fn fly_to(&mut self, destination: Cartesian3, duration_s: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CameraFlight {
    pub destination: Cartesian3,
    pub duration_s: f64,
}

/// Latest transforms per satellite plus the last camera request.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SceneSnapshot {
    #[schema(value_type = Vec<Option<EntityTransform>>)]
    pub satellites: [Option<EntityTransform>; SATELLITE_COUNT],
    pub camera: Option<CameraFlight>,
    /// Bumped on every camera request so clients can detect a new flight.
    pub camera_generation: u64,
}

impl SceneSink for SceneSnapshot {
    fn update_satellite(&mut self, index: SatelliteIndex, transform: EntityTransform) {
        self.satellites[index.as_usize()] = Some(transform);
    }

    fn fly_to(&mut self, destination: Cartesian3, duration_s: f64) {
        self.camera = Some(CameraFlight {
            destination,
            duration_s,
        });
        self.camera_generation += 1;
    }
}
