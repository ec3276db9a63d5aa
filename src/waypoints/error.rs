use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaypointError {
    #[error("waypoint file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid waypoint json in {file}: {message}")]
    InvalidJson { file: String, message: String },
    #[error("waypoint {index} in {file} is earlier than its predecessor")]
    OutOfOrder { file: String, index: usize },
}
