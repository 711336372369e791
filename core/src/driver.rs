//! Per-frame orchestration.
//!
//! One call to [`Game::step_frame`] runs, in order: physics step, pose
//! read-back, hand sampling (pose update, queued grab/release events, welding,
//! velocity tracking), the scoring check, and finally any due respawns.
//! Nothing here fails; a bad sample or missing body skips that update only.

use crate::ball::{Ball, BallId};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::grab::{release, try_grab, weld_held_balls, GrabOutcome, ReleaseOutcome};
use crate::hand::HandSide;
use crate::input::{HandAction, InputState};
use crate::physics::{BallDesc, RigidBodySimulator};
use crate::score::{ScoreDisplay, ScoreEvent};
use crate::scoring::{check_score, Hoop};
use crate::state::GameState;
use crate::vec3::Vec3;

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub grabs: Vec<(HandSide, GrabOutcome)>,
    pub releases: Vec<(HandSide, ReleaseOutcome)>,
    pub score: Option<ScoreEvent>,
    pub spawned: Option<BallId>,
    /// The ball's pose could not be read back this frame
    pub readback_skipped: bool,
}

/// Replace the ball in play with a fresh, pinned one at the spawn point.
///
/// The previous ball is removed from the simulator. If a hand was still
/// holding it, that hold is dropped first.
pub fn spawn_ball<S: RigidBodySimulator>(
    state: &mut GameState<S::Handle>,
    sim: &mut S,
    config: &GameConfig,
) -> BallId {
    if let Some(old) = state.ball.take() {
        if let Some(side) = old.held_by() {
            let hand = state.hand_mut(side);
            hand.held = None;
            hand.tracker.clear();
            tracing::info!("{} hand lost ball {} to respawn", side.as_str(), old.id);
        }
        sim.remove_body(old.body);
    }

    let desc = BallDesc::from_config(&config.ball);
    let body = sim.create_ball(&desc);
    // hovers at the spawn point until grabbed
    sim.set_response_factors(body, Vec3::ZERO, Vec3::ZERO);

    let id = state.allocate_ball_id();
    state.ball = Some(Ball::new(id, body, desc.pose));
    tracing::info!(
        "spawned ball {} at ({:.2}, {:.2}, {:.2})",
        id,
        desc.pose.position.x,
        desc.pose.position.y,
        desc.pose.position.z
    );
    id
}

/// Copy simulated poses into the visual transforms.
///
/// Returns false if the ball's motion state was unavailable; its transform
/// keeps last frame's value.
pub fn sync_transforms<S: RigidBodySimulator>(state: &mut GameState<S::Handle>, sim: &S) -> bool {
    let Some(ball) = state.ball.as_mut() else {
        return true;
    };
    match sim.read_pose(ball.body) {
        Some(pose) => {
            ball.transform = pose;
            true
        }
        None => {
            tracing::debug!("no motion state for ball {}, skipping read-back", ball.id);
            false
        }
    }
}

/// The game: configuration, state, and the external collaborators it drives.
pub struct Game<S: RigidBodySimulator, D: ScoreDisplay> {
    config: GameConfig,
    hoop: Hoop,
    state: GameState<S::Handle>,
    sim: S,
    display: D,
}

impl<S: RigidBodySimulator, D: ScoreDisplay> Game<S, D> {
    /// Validate `config` and start a game with one ball at the spawn point.
    pub fn new(config: GameConfig, mut sim: S, display: D) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = GameState::new(&config);
        spawn_ball(&mut state, &mut sim, &config);

        Ok(Self {
            hoop: Hoop::from_config(&config.hoop),
            config,
            state,
            sim,
            display,
        })
    }

    pub fn step_frame(&mut self, input: &mut InputState) -> FrameReport {
        let dt = self.config.step_dt;
        let mut report = FrameReport {
            frame: self.state.frame,
            ..Default::default()
        };

        self.sim.step(dt, self.config.substeps);
        report.readback_skipped = !sync_transforms(&mut self.state, &self.sim);

        for side in HandSide::ALL {
            if let Some(pose) = input.pose(side) {
                self.state.hand_mut(side).pose = pose;
            }
        }
        for event in input.drain_events() {
            match event.action {
                HandAction::GrabStart => {
                    let outcome =
                        try_grab(&mut self.state, &mut self.sim, event.side, &self.config);
                    if let GrabOutcome::Refused(reason) = outcome {
                        tracing::debug!("{} hand grab refused: {:?}", event.side.as_str(), reason);
                    }
                    report.grabs.push((event.side, outcome));
                }
                HandAction::GrabEnd => {
                    let outcome =
                        release(&mut self.state, &mut self.sim, event.side, &self.config);
                    report.releases.push((event.side, outcome));
                }
            }
        }
        weld_held_balls(&mut self.state, &mut self.sim);

        if let Some(event) = check_score(&mut self.state, &self.hoop) {
            self.display.on_score_changed(event.score);
            report.score = Some(event);
        }

        if self.state.respawn.tick(dt) > 0 {
            report.spawned = Some(spawn_ball(&mut self.state, &mut self.sim, &self.config));
        }

        self.state.elapsed += dt;
        self.state.frame += 1;
        report
    }

    /// Cancel pending respawns. Later frames still simulate but never spawn.
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.state.respawn.cancel_all();
        if dropped > 0 {
            tracing::warn!("cancelled {} pending respawn(s) at shutdown", dropped);
        }
        dropped
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hoop(&self) -> &Hoop {
        &self.hoop
    }

    pub fn state(&self) -> &GameState<S::Handle> {
        &self.state
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn score(&self) -> u64 {
        self.state.score.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Pose;
    use crate::testing::{FakeSimulator, RecordingDisplay};
    use crate::vec3::{self, vec3};

    fn game() -> Game<FakeSimulator, RecordingDisplay> {
        let config = GameConfig::default();
        let sim = FakeSimulator::new(config.room.gravity());
        Game::new(config, sim, RecordingDisplay::default()).unwrap()
    }

    #[test]
    fn new_game_spawns_pinned_ball() {
        let mut game = game();
        let ball = game.state().active_ball().unwrap();
        let body = ball.body;
        assert_eq!(ball.id, BallId(1));
        assert_eq!(game.sim().body(body).unwrap().linear_factor, Vec3::ZERO);

        let mut input = InputState::default();
        for _ in 0..30 {
            game.step_frame(&mut input);
        }
        let spawn = game.config().ball.spawn_position;
        assert_eq!(game.state().ball.as_ref().unwrap().transform.position, spawn);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            step_dt: 0.0,
            ..Default::default()
        };
        let sim = FakeSimulator::new(Vec3::ZERO);
        assert!(Game::new(config, sim, RecordingDisplay::default()).is_err());
    }

    #[test]
    fn events_wait_for_next_frame() {
        let mut game = game();
        let mut input = InputState::default();
        let spawn = game.config().ball.spawn_position;
        input.set_pose(HandSide::Left, Pose::at(spawn));
        input.grab(HandSide::Left);
        assert!(!game.state().hand(HandSide::Left).is_holding());

        let report = game.step_frame(&mut input);
        assert!(matches!(report.grabs[0], (HandSide::Left, GrabOutcome::Grabbed(_))));
        assert!(game.state().hand(HandSide::Left).is_holding());
    }

    #[test]
    fn unreadable_body_keeps_last_transform() {
        let mut game = game();
        let mut input = InputState::default();
        let body = game.state().ball.as_ref().unwrap().body;
        let spawn = game.config().ball.spawn_position;

        input.set_pose(HandSide::Right, Pose::at(spawn));
        input.grab(HandSide::Right);
        game.step_frame(&mut input);

        game.sim_mut().make_unreadable(body);
        input.set_pose(HandSide::Right, Pose::at(vec3::add(spawn, vec3(0.5, 0.0, 0.0))));
        let report = game.step_frame(&mut input);
        assert!(report.readback_skipped);
        assert_eq!(game.state().ball.as_ref().unwrap().transform.position, spawn);

        game.sim_mut().make_readable(body);
        let report = game.step_frame(&mut input);
        assert!(!report.readback_skipped);
        assert_ne!(game.state().ball.as_ref().unwrap().transform.position, spawn);
    }

    #[test]
    fn respawn_replaces_body_after_delay() {
        let mut game = game();
        let mut input = InputState::default();
        let spawn = game.config().ball.spawn_position;
        let first_body = game.state().ball.as_ref().unwrap().body;

        input.set_pose(HandSide::Right, Pose::at(spawn));
        input.grab(HandSide::Right);
        game.step_frame(&mut input);
        input.release(HandSide::Right);
        game.step_frame(&mut input);

        let mut spawned = None;
        for _ in 0..200 {
            if let Some(id) = game.step_frame(&mut input).spawned {
                spawned = Some(id);
                break;
            }
        }
        assert_eq!(spawned, Some(BallId(2)));
        assert!(game.sim().body(first_body).is_none());
        assert_eq!(game.sim().body_count(), 1);
        assert_eq!(game.state().active_ball().unwrap().id, BallId(2));
    }

    #[test]
    fn respawn_drops_a_hold_on_the_old_ball() {
        let mut game = game();
        let mut input = InputState::default();
        let spawn = game.config().ball.spawn_position;

        input.set_pose(HandSide::Left, Pose::at(spawn));
        input.grab(HandSide::Left);
        game.step_frame(&mut input);
        input.release(HandSide::Left);
        game.step_frame(&mut input);
        // catch the thrown ball again and hang on past the respawn
        input.grab(HandSide::Left);
        game.step_frame(&mut input);
        assert!(game.state().hand(HandSide::Left).is_holding());

        for _ in 0..200 {
            game.step_frame(&mut input);
        }
        assert!(!game.state().hand(HandSide::Left).is_holding());
        assert!(game.state().hold_links_consistent());
    }

    #[test]
    fn shutdown_cancels_pending_respawn() {
        let mut game = game();
        let mut input = InputState::default();
        let spawn = game.config().ball.spawn_position;

        input.set_pose(HandSide::Left, Pose::at(spawn));
        input.grab(HandSide::Left);
        game.step_frame(&mut input);
        input.release(HandSide::Left);
        game.step_frame(&mut input);

        assert_eq!(game.shutdown(), 1);
        for _ in 0..400 {
            assert!(game.step_frame(&mut input).spawned.is_none());
        }
        assert_eq!(game.state().ball.as_ref().unwrap().id, BallId(1));
    }

    #[test]
    fn release_without_hold_reports_noop() {
        let mut game = game();
        let mut input = InputState::default();
        input.release(HandSide::Right);
        let report = game.step_frame(&mut input);
        assert_eq!(
            report.releases,
            vec![(HandSide::Right, ReleaseOutcome::NotHolding)]
        );
        assert_eq!(game.state().respawn.pending_count(), 0);
    }
}
