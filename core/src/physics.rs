//! Seam between the game core and the external rigid-body simulator.

use crate::config::BallConfig;
use crate::vec3::{Quat, Vec3};

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with identity rotation
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

/// Everything the simulator needs to create a dynamic sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct BallDesc {
    pub radius: f64,
    pub mass: f64,
    pub restitution: f64,
    pub friction: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub pose: Pose,
}

impl BallDesc {
    pub fn from_config(config: &BallConfig) -> Self {
        Self {
            radius: config.radius,
            mass: config.mass,
            restitution: config.restitution,
            friction: config.friction,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            pose: Pose::at(config.spawn_position),
        }
    }
}

/// Rigid-body world operations the core relies on.
///
/// Implementations own the bodies; the core only keeps handles.
/// `read_pose` returning `None` means the body's motion state is unavailable
/// this frame and the caller skips its visual update.
pub trait RigidBodySimulator {
    type Handle: Copy + Eq + std::fmt::Debug;

    fn create_ball(&mut self, desc: &BallDesc) -> Self::Handle;

    fn remove_body(&mut self, handle: Self::Handle);

    fn set_pose(&mut self, handle: Self::Handle, pose: Pose);

    fn set_linear_velocity(&mut self, handle: Self::Handle, velocity: Vec3);

    /// Per-axis multipliers on simulated motion: zero pins an axis, one frees it.
    fn set_response_factors(&mut self, handle: Self::Handle, linear: Vec3, angular: Vec3);

    fn step(&mut self, dt: f64, substeps: u32);

    fn read_pose(&self, handle: Self::Handle) -> Option<Pose>;
}
