use crate::ball::BallId;
use crate::vec3::Vec3;

/// Made-basket counter. Only ever goes up, one per basket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Score(u64);

impl Score {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn increment(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Emitted once per made basket.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    pub ball: BallId,
    pub score: u64,
    /// Ball position on the step that crossed the rim plane
    pub position: Vec3,
}

/// External score readout. The core never renders text itself.
pub trait ScoreDisplay {
    fn on_score_changed(&mut self, score: u64);
}

impl<F: FnMut(u64)> ScoreDisplay for F {
    fn on_score_changed(&mut self, score: u64) {
        self(score)
    }
}

/// Text shown on the scoreboard. Shows the true count.
pub fn score_label(score: u64) -> String {
    format!("Score: {score}")
}
