use super::controls::ControlKeys;
use super::types::FlightState;

const SPEED_STEP: f64 = 100.0;
const MIN_SPEED: f64 = 500.0;
const PITCH_UP_STEP: f64 = 0.005;
const PITCH_DOWN_STEP: f64 = 0.01;
const PITCH_LIMIT: f64 = 0.3;
const ROLL_STEP: f64 = 0.005;
const SNAP_THRESHOLD: f64 = 0.001;

impl FlightState {
    /// Apply one tick of held-key control.
    pub fn apply_controls(&mut self, keys: &ControlKeys) {
        if keys.speed_up {
            self.speed += SPEED_STEP;
        }
        if keys.speed_down && self.speed - SPEED_STEP >= MIN_SPEED {
            self.speed -= SPEED_STEP;
        }
        // Out-of-range pitch (set externally) only ever moves the way the key points.
        if keys.up && self.pitch < PITCH_LIMIT {
            self.pitch = (self.pitch + PITCH_UP_STEP).min(PITCH_LIMIT);
        }
        if keys.down && self.pitch > -PITCH_LIMIT {
            self.pitch = (self.pitch - PITCH_DOWN_STEP).max(-PITCH_LIMIT);
        }
        if keys.left {
            self.roll -= ROLL_STEP;
        }
        if keys.right {
            self.roll += ROLL_STEP;
        }

        self.correction = (self.heading.cos() * self.pitch.cos()).abs();

        for angle in [&mut self.heading, &mut self.pitch, &mut self.roll] {
            if angle.abs() < SNAP_THRESHOLD {
                *angle = 0.0;
            }
        }
    }
}
