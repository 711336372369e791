//! Scripted hand that plays the game on its own.
//!
//! A bot is a small state machine driven once per frame:
//! - waits for a fresh ball, then reaches for it and grabs
//! - winds up to a swing start computed from a ballistic aim at the hoop
//! - swings in a straight line at constant speed, then releases
//! - returns to its rest position
//!
//! The release velocity comes out of the game's own velocity tracker, so the
//! bot exercises the same path as a real controller.

use std::str::FromStr;

use hoopshot_core::score::ScoreDisplay;
use hoopshot_core::throw::hand_velocity_for_launch;
use hoopshot_core::vec3::{self, vec3, Vec3};
use hoopshot_core::{BallId, Game, GameConfig, HandSide, InputState, Pose, RigidBodySimulator};
use rand::Rng;

/// Seconds to move from rest to the ball
const REACH_TIME: f64 = 0.4;
/// Seconds to move from the grab point to the swing start
const WINDUP_TIME: f64 = 0.35;
/// Seconds to return to rest after a throw
const RECOVER_TIME: f64 = 0.5;
/// Release point relative to where the ball was grabbed
const RELEASE_OFFSET: Vec3 = vec3(0.0, 0.4, -0.1);
/// Swing steps beyond the velocity history length
const EXTRA_SWING_STEPS: usize = 2;

/// Bot skill affects aim, timing and hand steadiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotSkill {
    /// Same arc every time, no noise
    Steady,
    /// Small aim errors and a slightly shaky hand
    Casual,
    /// Large aim errors, shaky hand, erratic pauses
    Wild,
}

impl BotSkill {
    /// Max horizontal aim error at the rim plane (m)
    fn aim_jitter(&self) -> f64 {
        match self {
            BotSkill::Steady => 0.0,
            BotSkill::Casual => 0.08,
            BotSkill::Wild => 0.3,
        }
    }

    /// Max per-axis noise on each swing sample (m)
    fn sample_noise(&self) -> f64 {
        match self {
            BotSkill::Steady => 0.0,
            BotSkill::Casual => 0.002,
            BotSkill::Wild => 0.01,
        }
    }

    /// Flight time range (min, max) in seconds
    fn flight_time_range(&self) -> (f64, f64) {
        match self {
            BotSkill::Steady => (1.3, 1.3),
            BotSkill::Casual => (1.15, 1.45),
            BotSkill::Wild => (0.9, 1.6),
        }
    }

    /// Pause before reaching for a new ball (min, max) in seconds
    fn hesitation_range(&self) -> (f64, f64) {
        match self {
            BotSkill::Steady => (0.3, 0.3),
            BotSkill::Casual => (0.3, 1.0),
            BotSkill::Wild => (0.1, 2.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BotSkill::Steady => "steady",
            BotSkill::Casual => "casual",
            BotSkill::Wild => "wild",
        }
    }
}

impl FromStr for BotSkill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "steady" => Ok(BotSkill::Steady),
            "casual" => Ok(BotSkill::Casual),
            "wild" => Ok(BotSkill::Wild),
            other => Err(format!("unknown bot skill {:?}", other)),
        }
    }
}

fn spread(rng: &mut impl Rng, (min, max): (f64, f64)) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

fn jitter(rng: &mut impl Rng, amount: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * amount
}

/// Launch velocity carrying a ball from `from` to `to` in `flight_time` seconds.
///
/// Linear damping is compensated to first order.
pub fn solve_launch(
    from: Vec3,
    to: Vec3,
    flight_time: f64,
    gravity_y: f64,
    linear_damping: f64,
) -> Vec3 {
    let drag = 1.0 / (1.0 - 0.5 * linear_damping * flight_time).max(0.5);
    let mut velocity = vec3::scale(vec3::sub(to, from), drag / flight_time);
    velocity.y -= 0.5 * gravity_y * flight_time;
    velocity
}

/// Point on the rim plane where a ball clears both the backboard and the
/// front of the rim.
pub fn aim_point(config: &GameConfig) -> Vec3 {
    let hoop = &config.hoop;
    let toward_player = (hoop.center_z - hoop.backboard_z).signum();
    let back = hoop.backboard_z
        + toward_player * (hoop.backboard_half_extents.z + config.ball.radius);
    let front = hoop.center_z
        + toward_player * (hoop.radius - hoop.tube_radius - config.ball.radius);
    vec3(hoop.center_x, hoop.plane_y, (back + front) / 2.0)
}

/// What the bot sees of the game before a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotObservation {
    pub ball: Option<(BallId, Vec3)>,
    pub holding: Option<BallId>,
}

impl BotObservation {
    pub fn of<S: RigidBodySimulator, D: ScoreDisplay>(game: &Game<S, D>, side: HandSide) -> Self {
        let state = game.state();
        Self {
            ball: state
                .active_ball()
                .map(|ball| (ball.id, ball.transform.position)),
            holding: state.hand(side).held_ball(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotOutput {
    pub pose: Pose,
    pub grab: bool,
    pub release: bool,
}

impl BotOutput {
    pub fn apply(&self, side: HandSide, input: &mut InputState) {
        input.set_pose(side, self.pose);
        if self.grab {
            input.grab(side);
        }
        if self.release {
            input.release(side);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BotPhase {
    Idle { wait: f64 },
    Reach { ball: BallId, from: Vec3, t: f64 },
    /// Grab sent, waiting to see it confirmed
    Grab { ball: BallId },
    WindUp { ball: BallId, from: Vec3, to: Vec3, step_delta: Vec3, t: f64 },
    Swing { ball: BallId, start: Vec3, step_delta: Vec3, step: usize },
    Release { ball: BallId },
    Recover { from: Vec3, t: f64 },
}

/// A bot driving one hand
#[derive(Debug)]
pub struct BotHand {
    pub side: HandSide,
    pub skill: BotSkill,
    phase: BotPhase,
    hand: Vec3,
    rest: Vec3,
    last_thrown: Option<BallId>,
    step_dt: f64,
    swing_steps: usize,
    multiplier: f64,
    arc_factor: f64,
    gravity_y: f64,
    linear_damping: f64,
    target: Vec3,
    /// Throws made so far
    pub throws: u64,
}

impl BotHand {
    pub fn new(side: HandSide, skill: BotSkill, config: &GameConfig) -> Self {
        let spawn = config.ball.spawn_position;
        let side_offset = match side {
            HandSide::Left => -0.2,
            HandSide::Right => 0.2,
        };
        let rest = vec3(spawn.x + side_offset, spawn.y - 0.2, spawn.z + 0.4);
        Self {
            side,
            skill,
            phase: BotPhase::Idle { wait: 0.0 },
            hand: rest,
            rest,
            last_thrown: None,
            step_dt: config.step_dt,
            swing_steps: config.history_len + EXTRA_SWING_STEPS,
            multiplier: config.throw_multiplier,
            arc_factor: config.arc_factor,
            gravity_y: config.room.gravity_y,
            linear_damping: config.ball.linear_damping,
            target: aim_point(config),
            throws: 0,
        }
    }

    pub fn phase(&self) -> BotPhase {
        self.phase
    }

    pub fn hand_position(&self) -> Vec3 {
        self.hand
    }

    /// Observe `game`, advance one frame and queue the result on `input`.
    pub fn drive<S: RigidBodySimulator, D: ScoreDisplay>(
        &mut self,
        game: &Game<S, D>,
        input: &mut InputState,
        rng: &mut impl Rng,
    ) -> BotOutput {
        let observation = BotObservation::of(game, self.side);
        let output = self.tick(game.config().step_dt, &observation, rng);
        output.apply(self.side, input);
        output
    }

    /// Advance the bot by one frame.
    pub fn tick(&mut self, dt: f64, seen: &BotObservation, rng: &mut impl Rng) -> BotOutput {
        let mut grab = false;
        let mut release = false;

        let phase = self.phase;
        self.phase = match phase {
            BotPhase::Idle { wait } => {
                let wait = wait - dt;
                match seen.ball {
                    Some((id, _)) if wait <= 0.0 && Some(id) != self.last_thrown => {
                        BotPhase::Reach {
                            ball: id,
                            from: self.hand,
                            t: 0.0,
                        }
                    }
                    _ => BotPhase::Idle { wait },
                }
            }
            BotPhase::Reach { ball, from, t } => match seen.ball {
                Some((id, position)) if id == ball => {
                    let t = t + dt;
                    let k = (t / REACH_TIME).min(1.0);
                    self.hand = vec3::lerp(from, position, k);
                    if k >= 1.0 {
                        grab = true;
                        BotPhase::Grab { ball }
                    } else {
                        BotPhase::Reach { ball, from, t }
                    }
                }
                _ => self.recover(),
            },
            BotPhase::Grab { ball } => {
                if seen.holding == Some(ball) {
                    self.plan_throw(ball, rng)
                } else {
                    tracing::debug!("bot {} grab missed ball {}", self.side.as_str(), ball);
                    BotPhase::Idle { wait: 0.0 }
                }
            }
            BotPhase::WindUp {
                ball,
                from,
                to,
                step_delta,
                t,
            } => {
                if seen.holding != Some(ball) {
                    self.recover()
                } else {
                    let t = t + dt;
                    let k = (t / WINDUP_TIME).min(1.0);
                    self.hand = vec3::lerp(from, to, k);
                    if k >= 1.0 {
                        BotPhase::Swing {
                            ball,
                            start: to,
                            step_delta,
                            step: 0,
                        }
                    } else {
                        BotPhase::WindUp {
                            ball,
                            from,
                            to,
                            step_delta,
                            t,
                        }
                    }
                }
            }
            BotPhase::Swing {
                ball,
                start,
                step_delta,
                step,
            } => {
                if seen.holding != Some(ball) {
                    self.recover()
                } else {
                    let step = step + 1;
                    let noise = self.skill.sample_noise();
                    let shake = vec3(jitter(rng, noise), jitter(rng, noise), jitter(rng, noise));
                    self.hand = vec3::add(
                        vec3::add(start, vec3::scale(step_delta, step as f64)),
                        shake,
                    );
                    if step >= self.swing_steps {
                        BotPhase::Release { ball }
                    } else {
                        BotPhase::Swing {
                            ball,
                            start,
                            step_delta,
                            step,
                        }
                    }
                }
            }
            BotPhase::Release { ball } => {
                if seen.holding == Some(ball) {
                    release = true;
                    self.last_thrown = Some(ball);
                    self.throws += 1;
                }
                self.recover()
            }
            BotPhase::Recover { from, t } => {
                let t = t + dt;
                let k = (t / RECOVER_TIME).min(1.0);
                self.hand = vec3::lerp(from, self.rest, k);
                if k >= 1.0 {
                    BotPhase::Idle {
                        wait: spread(rng, self.skill.hesitation_range()),
                    }
                } else {
                    BotPhase::Recover { from, t }
                }
            }
        };

        BotOutput {
            pose: Pose::at(self.hand),
            grab,
            release,
        }
    }

    fn recover(&self) -> BotPhase {
        BotPhase::Recover {
            from: self.hand,
            t: 0.0,
        }
    }

    /// Work back from the aim to the straight-line swing that produces it.
    fn plan_throw(&self, ball: BallId, rng: &mut impl Rng) -> BotPhase {
        let release_at = vec3::add(self.hand, RELEASE_OFFSET);
        let flight_time = spread(rng, self.skill.flight_time_range());
        let aim_error = self.skill.aim_jitter();
        let aim = vec3::add(
            self.target,
            vec3(jitter(rng, aim_error), 0.0, jitter(rng, aim_error)),
        );

        let launch = solve_launch(release_at, aim, flight_time, self.gravity_y, self.linear_damping);
        let hand_velocity = hand_velocity_for_launch(launch, self.multiplier, self.arc_factor);
        let step_delta = vec3::scale(hand_velocity, self.step_dt);
        let start = vec3::sub(release_at, vec3::scale(step_delta, self.swing_steps as f64));

        tracing::debug!(
            "bot {} aiming ball {} at ({:.2}, {:.2}, {:.2}), flight {:.2}s",
            self.side.as_str(),
            ball,
            aim.x,
            aim.y,
            aim.z,
            flight_time
        );
        BotPhase::WindUp {
            ball,
            from: self.hand,
            to: start,
            step_delta,
            t: 0.0,
        }
    }
}
