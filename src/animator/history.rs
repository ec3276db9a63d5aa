use std::collections::VecDeque;

use super::geodesy::Cartesian3;

pub const TRAJECTORY_CAPACITY: usize = 1000;

/// Trailing path of recently visited positions, oldest first.
#[derive(Debug, Clone)]
pub struct TrajectoryHistory {
    capacity: usize,
    samples: VecDeque<Cartesian3>,
}

impl Default for TrajectoryHistory {
    fn default() -> Self {
        Self::with_capacity(TRAJECTORY_CAPACITY)
    }
}

impl TrajectoryHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn push(&mut self, position: Cartesian3) {
        self.samples.push_back(position);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positions(&self) -> Vec<Cartesian3> {
        self.samples.iter().copied().collect()
    }
}
