//! Frame-loop behaviour against the in-memory simulator.

use hoopshot_core::grab::{GrabOutcome, ReleaseOutcome};
use hoopshot_core::testing::{FakeSimulator, RecordingDisplay};
use hoopshot_core::vec3::{self, vec3};
use hoopshot_core::{BallId, Game, GameConfig, HandSide, InputState, Pose, Vec3};

type TestGame = Game<FakeSimulator, RecordingDisplay>;

fn new_game() -> TestGame {
    let config = GameConfig::default();
    let sim = FakeSimulator::new(config.room.gravity());
    Game::new(config, sim, RecordingDisplay::default()).unwrap()
}

fn ball_body(game: &TestGame) -> u32 {
    game.state().ball.as_ref().unwrap().body
}

fn close(a: Vec3, b: Vec3, tol: f64) -> bool {
    vec3::distance(a, b) < tol
}

/// Grab the spawned ball with `side` from 0.1 units away.
fn grab_spawned_ball(game: &mut TestGame, input: &mut InputState, side: HandSide) -> Vec3 {
    let start = vec3::add(game.config().ball.spawn_position, vec3(0.1, 0.0, 0.0));
    input.set_pose(side, Pose::at(start));
    input.grab(side);
    let report = game.step_frame(input);
    assert!(matches!(report.grabs[0], (_, GrabOutcome::Grabbed(_))));
    start
}

#[test]
fn grab_move_release_throws_with_scaled_velocity() {
    let mut game = new_game();
    let mut input = InputState::default();
    let start = grab_spawned_ball(&mut game, &mut input, HandSide::Right);
    let body = ball_body(&game);

    for step in 1..=5 {
        let pos = vec3::add(start, vec3(step as f64, 0.0, 0.0));
        input.set_pose(HandSide::Right, Pose::at(pos));
        game.step_frame(&mut input);
        // welded: the body sits exactly on the hand
        assert_eq!(game.sim().body(body).unwrap().pose.position, pos);
    }

    input.release(HandSide::Right);
    let report = game.step_frame(&mut input);
    let (side, ReleaseOutcome::Thrown { velocity, .. }) = report.releases[0] else {
        panic!("expected a throw, got {:?}", report.releases);
    };
    assert_eq!(side, HandSide::Right);

    // 1 unit/step at 60 steps/s, amplified by 1.7, plus 0.3 of the horizontal speed
    let expected = vec3(102.0, 30.6, 0.0);
    assert!(close(velocity, expected, 1e-6), "got {:?}", velocity);
    let body_velocity = game.sim().body(body).unwrap().linear_velocity;
    assert!(body_velocity.x > 0.0);
    assert!(close(body_velocity, expected, 1e-6));

    assert!(!game.state().hand(HandSide::Right).is_holding());
    assert!(game.state().hold_links_consistent());
}

#[test]
fn hold_links_stay_consistent_through_play() {
    let mut game = new_game();
    let mut input = InputState::default();
    let spawn = game.config().ball.spawn_position;

    input.set_pose(HandSide::Left, Pose::at(spawn));
    input.set_pose(HandSide::Right, Pose::at(spawn));
    input.grab(HandSide::Left);
    input.grab(HandSide::Right);
    let report = game.step_frame(&mut input);
    assert!(matches!(report.grabs[0].1, GrabOutcome::Grabbed(_)));
    assert!(matches!(report.grabs[1].1, GrabOutcome::Refused(_)));
    assert!(game.state().hold_links_consistent());

    for frame in 0..400 {
        if frame % 37 == 0 {
            input.release(HandSide::Left);
        }
        if frame % 41 == 0 {
            input.grab(HandSide::Left);
            input.grab(HandSide::Right);
        }
        game.step_frame(&mut input);
        assert!(game.state().hold_links_consistent());
    }
}

#[test]
fn dropping_through_rim_scores_exactly_once() {
    let mut game = new_game();
    let mut input = InputState::default();
    grab_spawned_ball(&mut game, &mut input, HandSide::Left);

    let above_rim = vec3(0.0, 3.5, -4.65);
    input.set_pose(HandSide::Left, Pose::at(above_rim));
    for _ in 0..6 {
        game.step_frame(&mut input);
    }
    input.release(HandSide::Left);

    let mut scored_on = Vec::new();
    for _ in 0..150 {
        let report = game.step_frame(&mut input);
        if let Some(event) = report.score {
            scored_on.push(event);
        }
    }

    assert_eq!(scored_on.len(), 1);
    assert_eq!(scored_on[0].ball, BallId(1));
    assert!(scored_on[0].position.y <= game.hoop().plane_y);
    assert_eq!(game.score(), 1);
    assert_eq!(game.display().updates, vec![1]);
    assert!(game.state().active_ball().is_none());
}

#[test]
fn next_ball_starts_without_previous_height() {
    let mut game = new_game();
    let mut input = InputState::default();
    grab_spawned_ball(&mut game, &mut input, HandSide::Left);

    input.set_pose(HandSide::Left, Pose::at(vec3(0.0, 3.5, -4.65)));
    for _ in 0..6 {
        game.step_frame(&mut input);
    }
    input.release(HandSide::Left);

    let mut spawned = None;
    for _ in 0..400 {
        let report = game.step_frame(&mut input);
        if report.spawned.is_some() {
            spawned = report.spawned;
            break;
        }
    }

    assert_eq!(spawned, Some(BallId(2)));
    assert_eq!(game.score(), 1);
    let ball = game.state().active_ball().unwrap();
    assert_eq!(ball.previous_y, None);
    assert_eq!(ball.transform.position, game.config().ball.spawn_position);
}

#[test]
fn carrying_ball_down_through_rim_counts() {
    let mut game = new_game();
    let mut input = InputState::default();
    grab_spawned_ball(&mut game, &mut input, HandSide::Right);

    let mut y = 3.4;
    let mut scores = 0;
    while y > 2.5 {
        input.set_pose(HandSide::Right, Pose::at(vec3(0.05, y, -4.7)));
        if game.step_frame(&mut input).score.is_some() {
            scores += 1;
        }
        y -= 0.05;
    }
    assert_eq!(scores, 1);
    // the hold survives the score
    assert!(game.state().hand(HandSide::Right).is_holding());
}

#[test]
fn ball_passing_outside_rim_does_not_score() {
    let mut game = new_game();
    let mut input = InputState::default();
    grab_spawned_ball(&mut game, &mut input, HandSide::Right);

    input.set_pose(HandSide::Right, Pose::at(vec3(0.6, 3.5, -4.0)));
    for _ in 0..6 {
        game.step_frame(&mut input);
    }
    input.release(HandSide::Right);
    for _ in 0..150 {
        assert!(game.step_frame(&mut input).score.is_none());
    }
    assert_eq!(game.score(), 0);
    assert!(game.state().active_ball().is_some());
}

#[test]
fn each_release_schedules_a_respawn() {
    let mut game = new_game();
    let mut input = InputState::default();
    let spawn = game.config().ball.spawn_position;

    input.set_pose(HandSide::Left, Pose::at(spawn));
    for _ in 0..2 {
        input.grab(HandSide::Left);
        game.step_frame(&mut input);
        input.release(HandSide::Left);
        game.step_frame(&mut input);
    }
    assert_eq!(game.state().respawn.pending_count(), 2);

    let mut spawns = Vec::new();
    for _ in 0..250 {
        if let Some(id) = game.step_frame(&mut input).spawned {
            spawns.push(id);
        }
    }
    assert_eq!(spawns, vec![BallId(2), BallId(3)]);
    assert_eq!(game.sim().body_count(), 1);
}
