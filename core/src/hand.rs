use crate::ball::BallId;
use crate::physics::Pose;
use crate::vec3::Vec3;
use crate::velocity::VelocityTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    pub fn index(self) -> usize {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

/// One tracked controller.
///
/// `held` is a non-owning link to the ball: the ball slot in
/// [`GameState`](crate::state::GameState) owns the body, and the ball's
/// `held_by` points back at this hand.
#[derive(Debug, Clone)]
pub struct Hand {
    pub side: HandSide,
    pub pose: Pose,
    pub tracker: VelocityTracker,
    pub(crate) held: Option<BallId>,
}

impl Hand {
    pub fn new(side: HandSide, history_len: usize, steps_per_second: f64) -> Self {
        Self {
            side,
            pose: Pose::default(),
            tracker: VelocityTracker::new(history_len, steps_per_second),
            held: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    pub fn held_ball(&self) -> Option<BallId> {
        self.held
    }

    pub fn velocity(&self) -> Vec3 {
        self.tracker.current_velocity()
    }
}
