//! Hand/ball hold state machine: Free -> Holding -> Free.

use crate::ball::BallId;
use crate::config::GameConfig;
use crate::hand::HandSide;
use crate::physics::{Pose, RigidBodySimulator};
use crate::state::GameState;
use crate::throw::launch_velocity;
use crate::vec3::{self, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabRefusal {
    /// This hand is already holding a ball
    HandBusy,
    NoActiveBall,
    /// The other hand has it
    AlreadyHeld,
    OutOfRange { distance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabOutcome {
    Grabbed(BallId),
    Refused(GrabRefusal),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    Thrown { ball: BallId, velocity: Vec3 },
    NotHolding,
}

/// Attach the active ball to `side` if it is free and within reach.
///
/// A refused grab leaves every piece of state untouched.
pub fn try_grab<S: RigidBodySimulator>(
    state: &mut GameState<S::Handle>,
    sim: &mut S,
    side: HandSide,
    config: &GameConfig,
) -> GrabOutcome {
    if state.hand(side).is_holding() {
        return GrabOutcome::Refused(GrabRefusal::HandBusy);
    }
    let hand_pos = state.hand(side).position();

    let Some(ball) = state.active_ball_mut() else {
        return GrabOutcome::Refused(GrabRefusal::NoActiveBall);
    };
    if ball.held_by.is_some() {
        return GrabOutcome::Refused(GrabRefusal::AlreadyHeld);
    }
    let distance = vec3::distance(hand_pos, ball.transform.position);
    // inclusive: a hand exactly at the radius still grabs
    if distance > config.grab_radius {
        return GrabOutcome::Refused(GrabRefusal::OutOfRange { distance });
    }

    ball.held_by = Some(side);
    let id = ball.id;
    // free every axis now so the throw velocity takes effect on release
    sim.set_response_factors(ball.body, Vec3::ONE, Vec3::ONE);

    let hand = state.hand_mut(side);
    hand.held = Some(id);
    hand.tracker.clear();

    tracing::info!("{} hand grabbed ball {}", side.as_str(), id);
    GrabOutcome::Grabbed(id)
}

/// Throw whatever `side` holds and schedule the next spawn.
pub fn release<S: RigidBodySimulator>(
    state: &mut GameState<S::Handle>,
    sim: &mut S,
    side: HandSide,
    config: &GameConfig,
) -> ReleaseOutcome {
    let Some(held) = state.hand(side).held_ball() else {
        return ReleaseOutcome::NotHolding;
    };

    let hand_velocity = state.hand(side).velocity();
    let velocity = launch_velocity(hand_velocity, config.throw_multiplier, config.arc_factor);

    match state.ball.as_ref() {
        Some(ball) if ball.id == held => sim.set_linear_velocity(ball.body, velocity),
        _ => {
            tracing::debug!("{} hand released stale ball {}", side.as_str(), held);
            state.unlink_hand(side);
            return ReleaseOutcome::NotHolding;
        }
    }

    state.unlink_hand(side);
    state.respawn.schedule(config.respawn_delay);

    tracing::info!(
        "{} hand threw ball {} at ({:.2}, {:.2}, {:.2})",
        side.as_str(),
        held,
        velocity.x,
        velocity.y,
        velocity.z
    );
    ReleaseOutcome::Thrown {
        ball: held,
        velocity,
    }
}

/// Pin every held ball to its hand and sample the hand for velocity tracking.
///
/// The body is teleported rather than constrained: no grab lag, no
/// collision response while held. Its velocity is zeroed so gravity does
/// not build up between teleports.
pub fn weld_held_balls<S: RigidBodySimulator>(state: &mut GameState<S::Handle>, sim: &mut S) {
    for side in HandSide::ALL {
        let hand = &state.hands[side.index()];
        let Some(held) = hand.held else {
            continue;
        };
        let position = hand.position();

        if let Some(ball) = state.ball.as_ref().filter(|b| b.id == held) {
            sim.set_pose(ball.body, Pose::at(position));
            sim.set_linear_velocity(ball.body, Vec3::ZERO);
        }
        state.hands[side.index()].tracker.record(position);
    }
}
