use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::animator::{
    AnimatorContext, FlightState, SatelliteTrack, SimulationClock, DEFAULT_TICK_INTERVAL,
};
use crate::calibration::{default_sites, CalibrationSite};
use crate::waypoints::{load_timeline, WaypointError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("waypoints: {0}")]
    Waypoints(#[from] WaypointError),
    #[error("exactly 2 satellites must be configured, found {0}")]
    SatelliteCount(usize),
    #[error("clock multiplier must be finite and non-zero, got {0}")]
    Multiplier(f64),
    #[error("animation tick interval must be greater than zero")]
    TickInterval,
    #[error("clock stop {stop} is not after start {start}")]
    ClockRange {
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    pub satellites: Vec<SatelliteConfig>,
    #[serde(default = "default_sites")]
    pub sites: Vec<CalibrationSite>,
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let clock = SimulationClock::default();
        Self {
            start: clock.start,
            stop: clock.stop,
            multiplier: clock.multiplier,
        }
    }
}

fn default_multiplier() -> f64 {
    60.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick_interval: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub name: String,
    pub waypoints: PathBuf,
    pub initial: InitialPosition,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InitialPosition {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_altitude")]
    pub altitude_m: f64,
}

fn default_altitude() -> f64 {
    2000.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewState,
    ControlSatellites,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.satellites.len() != 2 {
            return Err(ConfigError::SatelliteCount(config.satellites.len()));
        }
        if config.clock.stop <= config.clock.start {
            return Err(ConfigError::ClockRange {
                start: config.clock.start,
                stop: config.clock.stop,
            });
        }
        if !config.clock.multiplier.is_finite() || config.clock.multiplier == 0.0 {
            return Err(ConfigError::Multiplier(config.clock.multiplier));
        }
        if config.animation.tick_interval.is_zero() {
            return Err(ConfigError::TickInterval);
        }
        Ok(config)
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }

    pub fn simulation_clock(&self) -> SimulationClock {
        SimulationClock::new(self.clock.start, self.clock.stop, self.clock.multiplier)
    }

    /// Load both waypoint timelines and build the initial animation state.
    pub fn build_context(&self) -> Result<AnimatorContext, ConfigError> {
        let [first, second] = self.satellites.as_slice() else {
            return Err(ConfigError::SatelliteCount(self.satellites.len()));
        };
        Ok(AnimatorContext::new(
            [first.load_track()?, second.load_track()?],
            self.simulation_clock(),
        ))
    }
}

impl SatelliteConfig {
    fn load_track(&self) -> Result<SatelliteTrack, ConfigError> {
        let waypoints = load_timeline(&self.waypoints)?;
        let initial = FlightState::at(self.initial.lat, self.initial.lng, self.initial.altitude_m);
        Ok(SatelliteTrack::new(self.name.clone(), waypoints, initial))
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
