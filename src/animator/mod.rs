mod animator;
mod clock;
mod context;
mod controls;
mod error;
mod flight;
mod geodesy;
mod history;
mod interpolation;
mod scene;
mod sensor;
mod types;

pub use animator::{Animator, DEFAULT_TICK_INTERVAL};
pub use clock::SimulationClock;
pub use context::{AnimatorContext, AnimatorStatus, SatelliteStatus, SatelliteTrack};
pub use controls::{ControlEvent, ControlKey, ControlKeys};
pub use error::AnimatorError;
pub use geodesy::{Cartesian3, Quaternion};
pub use scene::{CameraFlight, SceneSnapshot};
pub use types::{EntityTransform, FlightState, SatelliteIndex, SensorCone};
