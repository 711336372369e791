use crate::hand::HandSide;
use crate::physics::Pose;

/// Identifies one spawned ball. Ids increase monotonically per game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct BallId(pub u64);

impl std::fmt::Display for BallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The one simulated ball in play.
///
/// The ball exclusively owns its simulator handle. It stays in the world
/// after a throw or a score, and is only removed when the next spawn
/// replaces it.
#[derive(Debug, Clone)]
pub struct Ball<H> {
    pub id: BallId,
    pub body: H,
    /// Pose last read back from the simulator
    pub transform: Pose,
    pub(crate) held_by: Option<HandSide>,
    /// Height on the previous scoring check, `None` until the first check
    pub previous_y: Option<f64>,
    /// Whether the ball can still be grabbed and scored with
    pub(crate) active: bool,
}

impl<H> Ball<H> {
    pub(crate) fn new(id: BallId, body: H, transform: Pose) -> Self {
        Self {
            id,
            body,
            transform,
            held_by: None,
            previous_y: None,
            active: true,
        }
    }

    pub fn held_by(&self) -> Option<HandSide> {
        self.held_by
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drop out of play after a made basket.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        self.previous_y = None;
    }
}
