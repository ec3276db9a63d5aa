pub mod control;
pub mod error;
pub mod satellites;
pub mod scene;
