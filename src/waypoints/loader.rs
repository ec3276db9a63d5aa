use std::fs;
use std::path::Path;

use crate::waypoints::error::WaypointError;
use crate::waypoints::types::Waypoint;

/// Load a waypoint timeline from a JSON array file
pub fn load_timeline(path: &Path) -> Result<Vec<Waypoint>, WaypointError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let waypoints = parse_timeline(&content, &filename)?;
    if waypoints.len() < 2 {
        log::warn!(
            "Timeline {} has {} waypoint(s); the satellite will not move",
            filename,
            waypoints.len()
        );
    } else {
        log::info!("Loaded {} waypoints from {}", waypoints.len(), filename);
    }

    Ok(waypoints)
}

pub fn parse_timeline(content: &str, filename: &str) -> Result<Vec<Waypoint>, WaypointError> {
    let waypoints: Vec<Waypoint> =
        serde_json::from_str(content).map_err(|e| WaypointError::InvalidJson {
            file: filename.to_string(),
            message: e.to_string(),
        })?;

    if let Some(index) = waypoints
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time)
    {
        return Err(WaypointError::OutOfOrder {
            file: filename.to_string(),
            index: index + 1,
        });
    }

    Ok(waypoints)
}
