use std::collections::VecDeque;

use crate::vec3::{self, Vec3};

/// Bounded history of controller positions sampled once per simulation step.
///
/// Velocity is the mean of consecutive sample deltas times the step rate,
/// which smooths out per-frame controller jitter.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<Vec3>,
    capacity: usize,
    steps_per_second: f64,
}

impl VelocityTracker {
    pub fn new(capacity: usize, steps_per_second: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            steps_per_second,
        }
    }

    /// Append a sample, evicting the oldest once over capacity.
    pub fn record(&mut self, position: Vec3) {
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

    /// Smoothed velocity in units/second, zero with fewer than two samples.
    pub fn current_velocity(&self) -> Vec3 {
        if self.samples.len() < 2 {
            return Vec3::ZERO;
        }

        let mut total = Vec3::ZERO;
        for (prev, curr) in self.samples.iter().zip(self.samples.iter().skip(1)) {
            total = vec3::add(total, vec3::sub(*curr, *prev));
        }
        let deltas = (self.samples.len() - 1) as f64;
        vec3::scale(total, self.steps_per_second / deltas)
    }
}
