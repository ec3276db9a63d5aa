mod error;
mod loader;
mod types;

pub use error::WaypointError;
pub use loader::{load_timeline, parse_timeline};
pub use types::Waypoint;
