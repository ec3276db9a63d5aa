use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::clock::SimulationClock;
use super::controls::{ControlEvent, ControlKeys, EventQueue};
use super::geodesy::{heading_pitch_roll_quaternion, Cartesian3};
use super::history::TrajectoryHistory;
use super::interpolation::{blend_heading, interpolate, target_heading, WaypointCursor};
use super::scene::{SceneSink, CAMERA_FLIGHT_SECONDS};
use super::sensor::compute_sensor_cone;
use super::types::{EntityTransform, FlightState, SatelliteIndex, SensorCone, SATELLITE_COUNT};
use crate::waypoints::Waypoint;

/// Everything the animator owns for one satellite.
#[derive(Debug, Clone)]
pub struct SatelliteTrack {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub flight: FlightState,
    pub history: TrajectoryHistory,
    cursor: WaypointCursor,
}

impl SatelliteTrack {
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>, initial: FlightState) -> Self {
        Self {
            name: name.into(),
            waypoints,
            flight: initial,
            history: TrajectoryHistory::default(),
            cursor: WaypointCursor::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteStatus {
    #[schema(value_type = u8)]
    pub index: SatelliteIndex,
    pub name: String,
    pub flight: FlightState,
    pub waypoint_count: usize,
    pub history_len: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnimatorStatus {
    pub clock: SimulationClock,
    #[schema(value_type = u8)]
    pub selected: SatelliteIndex,
    pub autopilot: bool,
    pub attitude_override: bool,
    pub sensor_visible: bool,
    pub keys: ControlKeys,
    pub satellites: Vec<SatelliteStatus>,
}

/// All mutable animation state: flight states, histories, selection, key
/// state and the simulation clock. Mutated only from the tick or from
/// operations that run with exclusive access.
pub struct AnimatorContext {
    tracks: [SatelliteTrack; SATELLITE_COUNT],
    selected: SatelliteIndex,
    autopilot: bool,
    attitude_override: bool,
    sensor_visible: bool,
    keys: ControlKeys,
    events: EventQueue,
    clock: SimulationClock,
}

impl AnimatorContext {
    pub fn new(tracks: [SatelliteTrack; SATELLITE_COUNT], clock: SimulationClock) -> Self {
        Self {
            tracks,
            selected: SatelliteIndex::First,
            autopilot: true,
            attitude_override: false,
            sensor_visible: true,
            keys: ControlKeys::default(),
            events: EventQueue::default(),
            clock,
        }
    }

    pub fn track(&self, index: SatelliteIndex) -> &SatelliteTrack {
        &self.tracks[index.as_usize()]
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn selected(&self) -> SatelliteIndex {
        self.selected
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn attitude_override(&self) -> bool {
        self.attitude_override
    }

    pub fn push_event(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Apply queued input in arrival order.
    pub fn process_events(&mut self) {
        let events: Vec<ControlEvent> = self.events.drain().collect();
        for event in events {
            match event {
                ControlEvent::KeyDown { key } => {
                    log::debug!("Key {} down", key);
                    self.keys.set(key, true);
                }
                ControlEvent::KeyUp { key } => {
                    log::debug!("Key {} up", key);
                    self.keys.set(key, false);
                }
                ControlEvent::ToggleAutopilot => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot {}", if self.autopilot { "on" } else { "off" });
                }
                ControlEvent::SetAttitudeOverride { enabled } => {
                    self.attitude_override = enabled;
                    log::info!(
                        "Manual attitude override {}",
                        if enabled { "on" } else { "off" }
                    );
                }
                ControlEvent::SetSensorVisible { visible } => self.sensor_visible = visible,
                ControlEvent::Select { index } => self.select(index),
                ControlEvent::Pick { entity_id } => match SatelliteIndex::from_entity_id(&entity_id)
                {
                    Some(index) => self.select(index),
                    None => log::debug!("Ignoring pick on {}", entity_id),
                },
            }
        }
    }

    fn select(&mut self, index: SatelliteIndex) {
        if self.selected != index {
            log::info!("Manual control switched to {}", self.track(index).name);
        }
        self.selected = index;
    }

    /// Apply held control keys to the selected satellite.
    pub fn apply_manual_control_tick(&mut self) {
        let keys = self.keys;
        self.tracks[self.selected.as_usize()]
            .flight
            .apply_controls(&keys);
    }

    /// Move every satellite to its interpolated position at `current_time`.
    ///
    /// Satellites without a bracketing waypoint pair are left untouched.
    pub fn advance_attitude(&mut self, current_time: DateTime<Utc>, scene: &mut dyn SceneSink) {
        let epoch = self.clock.epoch();
        let elapsed_ms = (current_time - epoch).num_milliseconds();

        for index in SatelliteIndex::ALL {
            let is_selected = index == self.selected;
            let follow_track = !self.attitude_override;
            let track = &mut self.tracks[index.as_usize()];

            let Some(segment) = track.cursor.locate(&track.waypoints, epoch, elapsed_ms) else {
                continue;
            };

            let point = interpolate(segment.p0, segment.p1, segment.ratio);
            let target = target_heading(segment.p0, segment.p1);

            let flight = &mut track.flight;
            flight.latitude_deg = point.latitude_deg;
            flight.longitude_deg = point.longitude_deg;
            flight.altitude_m = point.altitude_m;

            if follow_track {
                flight.heading = if is_selected {
                    blend_heading(flight.heading, target)
                } else {
                    target
                };
            }

            let position = flight.position();
            let orientation = heading_pitch_roll_quaternion(
                flight.latitude_deg,
                flight.longitude_deg,
                flight.heading,
                flight.pitch,
                flight.roll,
            );
            scene.update_satellite(
                index,
                EntityTransform {
                    position,
                    orientation,
                    ground_position: flight.ground_position(),
                },
            );

            if current_time >= epoch {
                track.history.push(position);
            }
        }
    }

    /// Jump a satellite to an externally computed attitude and time.
    pub fn apply_external_result(
        &mut self,
        index: SatelliteIndex,
        time: DateTime<Utc>,
        roll_deg: f64,
        pitch_deg: f64,
        scene: &mut dyn SceneSink,
    ) {
        log::info!(
            "Applying result to {}: t={} roll={}° pitch={}°",
            self.track(index).name,
            time,
            roll_deg,
            pitch_deg
        );

        let track = &mut self.tracks[index.as_usize()];
        track.history.clear();
        track.flight.roll = roll_deg.to_radians();
        track.flight.pitch = pitch_deg.to_radians();

        self.clock.set_current(time);
        self.advance_attitude(time, scene);

        let destination = self.track(index).flight.position();
        scene.fly_to(destination, CAMERA_FLIGHT_SECONDS);
    }

    pub fn clear_trajectory(&mut self, index: SatelliteIndex) {
        self.tracks[index.as_usize()].history.clear();
    }

    /// One frame: advance the clock, apply input, move the satellites.
    pub fn tick(&mut self, real_dt: std::time::Duration, scene: &mut dyn SceneSink) {
        self.clock.advance(real_dt);
        self.process_events();
        self.apply_manual_control_tick();
        self.advance_attitude(self.clock.current, scene);
    }

    pub fn sensor_cone(&self, index: SatelliteIndex) -> SensorCone {
        let flight = &self.track(index).flight;
        SensorCone {
            visible: self.sensor_visible,
            ..compute_sensor_cone(&flight.position(), &flight.ground_position(), flight)
        }
    }

    pub fn trajectory(&self, index: SatelliteIndex) -> Vec<Cartesian3> {
        self.track(index).history.positions()
    }

    pub fn status(&self) -> AnimatorStatus {
        AnimatorStatus {
            clock: self.clock,
            selected: self.selected,
            autopilot: self.autopilot,
            attitude_override: self.attitude_override,
            sensor_visible: self.sensor_visible,
            keys: self.keys,
            satellites: SatelliteIndex::ALL
                .iter()
                .map(|&index| {
                    let track = self.track(index);
                    SatelliteStatus {
                        index,
                        name: track.name.clone(),
                        flight: track.flight,
                        waypoint_count: track.waypoints.len(),
                        history_len: track.history.len(),
                    }
                })
                .collect(),
        }
    }
}
