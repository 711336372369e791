//! In-memory collaborators for tests, behind the `testing` feature.

use std::collections::{HashMap, HashSet};

use crate::physics::{BallDesc, Pose, RigidBodySimulator};
use crate::score::ScoreDisplay;
use crate::vec3::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct FakeBody {
    pub pose: Pose,
    pub radius: f64,
    pub linear_velocity: Vec3,
    pub linear_factor: Vec3,
    pub angular_factor: Vec3,
}

/// Point-mass world: gravity and velocity integration, no collisions.
#[derive(Debug, Default)]
pub struct FakeSimulator {
    gravity: Vec3,
    bodies: HashMap<u32, FakeBody>,
    unreadable: HashSet<u32>,
    next_handle: u32,
    /// Number of `step` calls so far
    pub steps: u64,
}

impl FakeSimulator {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    pub fn body(&self, handle: u32) -> Option<&FakeBody> {
        self.bodies.get(&handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Make `read_pose` fail for this body, as if its motion state were gone.
    pub fn make_unreadable(&mut self, handle: u32) {
        self.unreadable.insert(handle);
    }

    pub fn make_readable(&mut self, handle: u32) {
        self.unreadable.remove(&handle);
    }
}

impl RigidBodySimulator for FakeSimulator {
    type Handle = u32;

    fn create_ball(&mut self, desc: &BallDesc) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            FakeBody {
                pose: desc.pose,
                radius: desc.radius,
                linear_velocity: Vec3::ZERO,
                linear_factor: Vec3::ONE,
                angular_factor: Vec3::ONE,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: u32) {
        self.bodies.remove(&handle);
        self.unreadable.remove(&handle);
    }

    fn set_pose(&mut self, handle: u32, pose: Pose) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.pose = pose;
        }
    }

    fn set_linear_velocity(&mut self, handle: u32, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.linear_velocity = velocity;
        }
    }

    fn set_response_factors(&mut self, handle: u32, linear: Vec3, angular: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.linear_factor = linear;
            body.angular_factor = angular;
        }
    }

    fn step(&mut self, dt: f64, substeps: u32) {
        self.steps += 1;
        let substeps = substeps.max(1);
        let h = dt / substeps as f64;
        for body in self.bodies.values_mut() {
            let f = body.linear_factor;
            for _ in 0..substeps {
                let v = &mut body.linear_velocity;
                v.x += self.gravity.x * h * f.x;
                v.y += self.gravity.y * h * f.y;
                v.z += self.gravity.z * h * f.z;

                let p = &mut body.pose.position;
                p.x += v.x * h * f.x;
                p.y += v.y * h * f.y;
                p.z += v.z * h * f.z;
            }
        }
    }

    fn read_pose(&self, handle: u32) -> Option<Pose> {
        if self.unreadable.contains(&handle) {
            return None;
        }
        self.bodies.get(&handle).map(|b| b.pose)
    }
}

/// Remembers every score it was shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub updates: Vec<u64>,
}

impl RecordingDisplay {
    pub fn last(&self) -> Option<u64> {
        self.updates.last().copied()
    }
}

impl ScoreDisplay for RecordingDisplay {
    fn on_score_changed(&mut self, score: u64) {
        self.updates.push(score);
    }
}
