use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use super::types::SatelliteIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ControlKey {
    /// Pitch up (`w`)
    Up,
    /// Pitch down (`s`)
    Down,
    /// Roll left (`a`)
    Left,
    /// Roll right (`d`)
    Right,
    /// Speed up (`q`)
    SpeedUp,
    /// Speed down (`e`)
    SpeedDown,
}

impl ControlKey {
    pub fn from_keyboard(key: &str) -> Option<Self> {
        match key {
            "w" => Some(ControlKey::Up),
            "s" => Some(ControlKey::Down),
            "a" => Some(ControlKey::Left),
            "d" => Some(ControlKey::Right),
            "q" => Some(ControlKey::SpeedUp),
            "e" => Some(ControlKey::SpeedDown),
            _ => None,
        }
    }
}

/// Input captured between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlEvent {
    KeyDown { key: ControlKey },
    KeyUp { key: ControlKey },
    /// Flip the reported autopilot flag. Does not change the animation.
    ToggleAutopilot,
    /// Hold every satellite's heading instead of following the track.
    SetAttitudeOverride { enabled: bool },
    SetSensorVisible { visible: bool },
    Select {
        #[schema(value_type = u8)]
        index: SatelliteIndex,
    },
    /// A pointer pick on a rendered entity.
    Pick { entity_id: String },
}

impl ControlEvent {
    /// Map a raw key-down from the keyboard surface to an event.
    pub fn from_key_down(key: &str) -> Option<Self> {
        if let Some(key) = ControlKey::from_keyboard(key) {
            return Some(ControlEvent::KeyDown { key });
        }
        match key {
            "m" => Some(ControlEvent::ToggleAutopilot),
            "1" => Some(ControlEvent::Select {
                index: SatelliteIndex::First,
            }),
            "2" => Some(ControlEvent::Select {
                index: SatelliteIndex::Second,
            }),
            _ => None,
        }
    }

    pub fn from_key_up(key: &str) -> Option<Self> {
        ControlKey::from_keyboard(key).map(|key| ControlEvent::KeyUp { key })
    }
}

/// Currently held control keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ControlKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub speed_up: bool,
    pub speed_down: bool,
}

impl ControlKeys {
    pub fn set(&mut self, key: ControlKey, held: bool) {
        let flag = match key {
            ControlKey::Up => &mut self.up,
            ControlKey::Down => &mut self.down,
            ControlKey::Left => &mut self.left,
            ControlKey::Right => &mut self.right,
            ControlKey::SpeedUp => &mut self.speed_up,
            ControlKey::SpeedDown => &mut self.speed_down,
        };
        *flag = held;
    }

    pub fn is_held(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::Up => self.up,
            ControlKey::Down => self.down,
            ControlKey::Left => self.left,
            ControlKey::Right => self.right,
            ControlKey::SpeedUp => self.speed_up,
            ControlKey::SpeedDown => self.speed_down,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<ControlEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: ControlEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ControlEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [ControlKey; 6] = [
        ControlKey::Up,
        ControlKey::Down,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::SpeedUp,
        ControlKey::SpeedDown,
    ];

    #[test]
    fn test_keyboard_mapping() {
        assert_eq!(
            ControlEvent::from_key_down("w"),
            Some(ControlEvent::KeyDown {
                key: ControlKey::Up
            })
        );
        assert_eq!(
            ControlEvent::from_key_down("2"),
            Some(ControlEvent::Select {
                index: SatelliteIndex::Second
            })
        );
        assert_eq!(
            ControlEvent::from_key_down("m"),
            Some(ControlEvent::ToggleAutopilot)
        );
        assert_eq!(ControlEvent::from_key_up("m"), None);
        assert_eq!(ControlEvent::from_key_down("x"), None);
    }

    #[test]
    fn test_key_state_last_write_wins() {
        let mut keys = ControlKeys::default();
        for key in ALL_KEYS {
            keys.set(key, true);
            keys.set(key, false);
            keys.set(key, true);
            assert!(keys.is_held(key));
        }
        keys.set(ControlKey::Left, false);
        assert!(!keys.left);
        assert!(keys.right);
    }

    #[test]
    fn test_event_json_shape() {
        let event: ControlEvent =
            serde_json::from_str(r#"{"type": "key_down", "key": "speed_up"}"#).unwrap();
        assert_eq!(
            event,
            ControlEvent::KeyDown {
                key: ControlKey::SpeedUp
            }
        );
        assert_eq!(ControlKey::SpeedDown.to_string(), "speed_down");

        let event: ControlEvent =
            serde_json::from_str(r#"{"type": "set_attitude_override", "enabled": true}"#)
                .unwrap();
        assert_eq!(event, ControlEvent::SetAttitudeOverride { enabled: true });
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = EventQueue::default();
        queue.push(ControlEvent::ToggleAutopilot);
        queue.push(ControlEvent::KeyUp {
            key: ControlKey::Up,
        });
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], ControlEvent::ToggleAutopilot);
        assert_eq!(queue.len(), 0);
    }
}
