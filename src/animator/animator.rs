use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::context::{AnimatorContext, AnimatorStatus};
use super::controls::ControlEvent;
use super::error::AnimatorError;
use super::geodesy::Cartesian3;
use super::scene::SceneSnapshot;
use super::types::{FlightState, SatelliteIndex, SensorCone};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

struct Shared {
    context: AnimatorContext,
    scene: SceneSnapshot,
}

struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the animation context and the task that ticks it.
pub struct Animator {
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
    tick_interval: Duration,
}

impl Animator {
    pub fn new(context: AnimatorContext, tick_interval: Duration) -> Self {
        Self {
            shared: Arc::new(StdMutex::new(Shared {
                context,
                scene: SceneSnapshot::default(),
            })),
            worker: None,
            tick_interval,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Start ticking at the configured interval.
    pub fn start(&mut self) -> Result<(), AnimatorError> {
        if self.worker.is_some() {
            return Err(AnimatorError::AlreadyRunning);
        }
        if self.tick_interval.is_zero() {
            return Err(AnimatorError::ZeroTickInterval);
        }

        let shared = self.shared.clone();
        let tick_interval = self.tick_interval;
        let (stop_tx, stop_rx) = oneshot::channel();

        let join = tokio::spawn(run_animation_loop(shared, tick_interval, stop_rx));
        self.worker = Some(WorkerHandle { stop_tx, join });

        log::info!("Animator started ({:?} per tick)", tick_interval);
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            log::info!("Animator stopped");
        }
    }

    pub fn status(&self) -> AnimatorStatus {
        lock(&self.shared).context.status()
    }

    pub fn scene(&self) -> SceneSnapshot {
        lock(&self.shared).scene.clone()
    }

    pub fn flight(&self, index: SatelliteIndex) -> FlightState {
        lock(&self.shared).context.track(index).flight
    }

    pub fn trajectory(&self, index: SatelliteIndex) -> Vec<Cartesian3> {
        lock(&self.shared).context.trajectory(index)
    }

    pub fn sensor_cone(&self, index: SatelliteIndex) -> SensorCone {
        lock(&self.shared).context.sensor_cone(index)
    }

    /// Queue input for the next tick.
    pub fn push_event(&self, event: ControlEvent) {
        lock(&self.shared).context.push_event(event);
    }

    pub fn apply_external_result(
        &self,
        index: SatelliteIndex,
        time: DateTime<Utc>,
        roll_deg: f64,
        pitch_deg: f64,
    ) -> FlightState {
        let mut locked = lock(&self.shared);
        let Shared { context, scene } = &mut *locked;
        context.apply_external_result(index, time, roll_deg, pitch_deg, scene);
        context.track(index).flight
    }

    pub fn clear_trajectory(&self, index: SatelliteIndex) {
        lock(&self.shared).context.clear_trajectory(index);
    }

    /// Run `count` ticks of `step` synchronously, without the timer task.
    pub fn step(&self, count: usize, step: Duration) {
        let mut locked = lock(&self.shared);
        let Shared { context, scene } = &mut *locked;
        for _ in 0..count {
            context.tick(step, scene);
        }
    }
}

fn lock(shared: &StdMutex<Shared>) -> MutexGuard<'_, Shared> {
    // A panic mid-tick leaves plain numeric state behind; keep animating.
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_animation_loop(
    shared: Arc<StdMutex<Shared>>,
    tick_interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        let now = Instant::now();
        let real_dt = now - last;
        last = now;

        let mut locked = lock(&shared);
        let Shared { context, scene } = &mut *locked;
        context.tick(real_dt, scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::clock::SimulationClock;
    use crate::animator::context::SatelliteTrack;
    use crate::waypoints::Waypoint;
    use chrono::Duration as ChronoDuration;

    fn animator() -> Animator {
        animator_ticking_every(Duration::from_millis(10))
    }

    fn animator_ticking_every(tick_interval: Duration) -> Animator {
        let clock = SimulationClock::default();
        let track = |name: &str, lat: f64| {
            let waypoints = vec![
                Waypoint {
                    time: clock.epoch(),
                    lat,
                    lng: 100.0,
                    alt: 1000.0,
                },
                Waypoint {
                    time: clock.epoch() + ChronoDuration::hours(24),
                    lat,
                    lng: 101.0,
                    alt: 1000.0,
                },
            ];
            SatelliteTrack::new(name, waypoints, FlightState::at(lat, 100.0, 1000.0))
        };
        let context = AnimatorContext::new([track("a", 10.0), track("b", 20.0)], clock);
        Animator::new(context, tick_interval)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_until_stopped() {
        let mut animator = animator();
        animator.start().unwrap();
        assert!(animator.is_running());
        assert!(matches!(animator.start(), Err(AnimatorError::AlreadyRunning)));

        tokio::time::sleep(Duration::from_secs(1)).await;
        animator.stop().await;
        assert!(!animator.is_running());

        let status = animator.status();
        let elapsed = status.clock.current - status.clock.start;
        assert!(elapsed >= ChronoDuration::seconds(50));
        assert!(status.satellites[0].history_len > 0);

        let frozen = animator.status().clock.current;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(animator.status().clock.current, frozen);
    }

    #[tokio::test]
    async fn test_zero_interval_is_refused() {
        let mut animator = animator_ticking_every(Duration::ZERO);
        assert!(matches!(
            animator.start(),
            Err(AnimatorError::ZeroTickInterval)
        ));
        assert!(!animator.is_running());
    }

    #[tokio::test]
    async fn test_events_apply_on_next_tick() {
        let animator = animator();
        animator.push_event(ControlEvent::Select {
            index: SatelliteIndex::Second,
        });
        assert_eq!(animator.status().selected, SatelliteIndex::First);

        animator.step(1, Duration::from_millis(16));
        assert_eq!(animator.status().selected, SatelliteIndex::Second);
    }

    #[tokio::test]
    async fn test_external_result_updates_scene() {
        let animator = animator();
        let time = SimulationClock::default().epoch() + ChronoDuration::hours(12);
        let flight = animator.apply_external_result(SatelliteIndex::First, time, 0.0, 0.0);

        assert!((flight.longitude_deg - 100.5).abs() < 1e-9);
        let scene = animator.scene();
        assert_eq!(scene.camera.map(|c| c.destination), Some(flight.position()));
        assert_eq!(animator.trajectory(SatelliteIndex::First).len(), 1);

        animator.clear_trajectory(SatelliteIndex::First);
        assert!(animator.trajectory(SatelliteIndex::First).is_empty());
    }
}
