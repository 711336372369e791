//! Hoopshot game core.
//!
//! The grab/throw/score state machine of a VR basketball game. Physics and
//! the score readout are external collaborators reached through
//! [`physics::RigidBodySimulator`] and [`score::ScoreDisplay`].

pub mod ball;
pub mod config;
pub mod driver;
pub mod error;
pub mod grab;
pub mod hand;
pub mod input;
pub mod physics;
pub mod respawn;
pub mod score;
pub mod scoring;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod throw;
pub mod vec3;
pub mod velocity;

pub use ball::BallId;
pub use config::GameConfig;
pub use driver::{FrameReport, Game};
pub use error::ConfigError;
pub use hand::HandSide;
pub use input::InputState;
pub use physics::{Pose, RigidBodySimulator};
pub use vec3::Vec3;
