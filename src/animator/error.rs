use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimatorError {
    #[error("animator already running")]
    AlreadyRunning,
    #[error("invalid satellite index: {0}")]
    InvalidSatellite(usize),
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}
