use crate::config::HoopConfig;
use crate::score::ScoreEvent;
use crate::state::GameState;
use crate::vec3::Vec3;

/// Rim geometry used for the crossing test. Never simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop {
    pub plane_y: f64,
    pub center_x: f64,
    pub center_z: f64,
    pub radius: f64,
}

impl Hoop {
    pub fn from_config(config: &HoopConfig) -> Self {
        Self {
            plane_y: config.plane_y,
            center_x: config.center_x,
            center_z: config.center_z,
            radius: config.radius,
        }
    }

    pub fn horizontal_distance(&self, position: Vec3) -> f64 {
        let dx = position.x - self.center_x;
        let dz = position.z - self.center_z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Strictly above the plane last step, at or below it now, inside the rim.
    pub fn is_made_basket(&self, previous_y: f64, position: Vec3) -> bool {
        previous_y > self.plane_y
            && position.y <= self.plane_y
            && self.horizontal_distance(position) <= self.radius
    }
}

/// One scoring check against the active ball.
///
/// Edge-triggered on the downward plane crossing, so a ball resting under
/// the rim is never counted twice and a fast drop between two samples is
/// never missed. On a basket the ball leaves play until the next spawn.
pub fn check_score<H>(state: &mut GameState<H>, hoop: &Hoop) -> Option<ScoreEvent> {
    let ball = state.active_ball_mut()?;
    let position = ball.transform.position;

    let made = ball
        .previous_y
        .is_some_and(|previous_y| hoop.is_made_basket(previous_y, position));
    if !made {
        ball.previous_y = Some(position.y);
        return None;
    }

    ball.deactivate();
    let id = ball.id;
    let score = state.score.increment();
    tracing::info!("ball {} scored, score is now {}", id, score);
    Some(ScoreEvent {
        ball: id,
        score,
        position,
    })
}
