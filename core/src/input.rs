use std::collections::VecDeque;

use crate::hand::HandSide;
use crate::physics::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandAction {
    GrabStart,
    GrabEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HandEvent {
    pub side: HandSide,
    pub action: HandAction,
}

/// Input collected between frames.
///
/// Poses overwrite each other (latest wins); grab/release events queue up in
/// arrival order and are only acted on when the next frame drains them.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    poses: [Option<Pose>; 2],
    events: VecDeque<HandEvent>,
}

impl InputState {
    pub fn set_pose(&mut self, side: HandSide, pose: Pose) {
        self.poses[side.index()] = Some(pose);
    }

    /// Latest tracked pose, `None` if the controller was never seen.
    pub fn pose(&self, side: HandSide) -> Option<Pose> {
        self.poses[side.index()]
    }

    pub fn push(&mut self, event: HandEvent) {
        self.events.push_back(event);
    }

    pub fn grab(&mut self, side: HandSide) {
        self.push(HandEvent {
            side,
            action: HandAction::GrabStart,
        });
    }

    pub fn release(&mut self, side: HandSide) {
        self.push(HandEvent {
            side,
            action: HandAction::GrabEnd,
        });
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = HandEvent> + '_ {
        self.events.drain(..)
    }
}
