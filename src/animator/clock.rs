use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Simulation clock that loops back to `start` once it passes `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SimulationClock {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub current: DateTime<Utc>,
    pub multiplier: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        let start = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2021, 6, 10, 0, 0, 0).unwrap();
        Self::new(start, stop, 60.0)
    }
}

impl SimulationClock {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>, multiplier: f64) -> Self {
        Self {
            start,
            stop,
            current: start,
            multiplier,
        }
    }

    /// Zero point for elapsed-time calculations.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.start
    }

    /// Advance by `real` wall time scaled by the multiplier.
    pub fn advance(&mut self, real: std::time::Duration) {
        let scaled_us = real.as_secs_f64() * self.multiplier * 1.0e6;
        let next = if scaled_us.is_finite() && scaled_us.abs() < i64::MAX as f64 {
            self.current
                .checked_add_signed(Duration::microseconds(scaled_us as i64))
        } else {
            None
        };

        self.current = match next {
            Some(next) if next >= self.start && next <= self.stop => next,
            _ if self.multiplier >= 0.0 => self.start,
            _ => self.stop,
        };
    }

    pub fn set_current(&mut self, time: DateTime<Utc>) {
        self.current = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_advance_scales_by_multiplier() {
        let mut clock = SimulationClock::default();
        clock.advance(StdDuration::from_secs(1));
        assert_eq!(clock.current - clock.start, Duration::seconds(60));
    }

    #[test]
    fn test_loops_to_start_past_stop() {
        let mut clock = SimulationClock::default();
        clock.set_current(clock.stop - Duration::seconds(30));
        clock.advance(StdDuration::from_secs(1));
        assert_eq!(clock.current, clock.start);
    }

    #[test]
    fn test_huge_multiplier_wraps_instead_of_overflowing() {
        let mut clock = SimulationClock::default();
        clock.multiplier = 1.0e20;
        clock.advance(StdDuration::from_millis(16));
        assert_eq!(clock.current, clock.start);

        clock.multiplier = -1.0e20;
        clock.advance(StdDuration::from_millis(16));
        assert_eq!(clock.current, clock.stop);

        clock.multiplier = f64::INFINITY;
        clock.advance(StdDuration::from_millis(16));
        assert_eq!(clock.current, clock.start);
    }

    #[test]
    fn test_reaching_stop_exactly_does_not_wrap() {
        let mut clock = SimulationClock::default();
        clock.set_current(clock.stop - Duration::seconds(60));
        clock.advance(StdDuration::from_secs(1));
        assert_eq!(clock.current, clock.stop);
    }
}
