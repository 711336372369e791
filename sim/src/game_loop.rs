use std::time::Duration;

use hoopshot_core::grab::{GrabOutcome, ReleaseOutcome};
use hoopshot_core::score::{score_label, ScoreDisplay};
use hoopshot_core::{BallId, ConfigError, FrameReport, Game, GameConfig, HandSide, InputState, Pose, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};

use crate::bot::BotHand;
use crate::config::SimConfig;
use crate::physics::RapierWorld;
use crate::room::build_room;

/// Input from controllers (or anything pretending to be one) to the game loop
#[derive(Debug, Clone)]
pub enum GameCommand {
    HandPose { side: HandSide, pose: Pose },
    Grab { side: HandSide },
    Release { side: HandSide },
    Shutdown,
}

/// Broadcasts from the game loop to displays and observers
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameBroadcast {
    BallSpawned { ball: BallId },
    Grabbed { side: HandSide, ball: BallId },
    Thrown { side: HandSide, ball: BallId, velocity: Vec3 },
    ScoreChanged { score: u64, label: String },
}

/// Score display that forwards every change to broadcast subscribers.
pub struct BroadcastDisplay {
    tx: broadcast::Sender<GameBroadcast>,
}

impl BroadcastDisplay {
    pub fn new(tx: broadcast::Sender<GameBroadcast>) -> Self {
        Self { tx }
    }
}

impl ScoreDisplay for BroadcastDisplay {
    fn on_score_changed(&mut self, score: u64) {
        // no subscribers is fine
        let _ = self.tx.send(GameBroadcast::ScoreChanged {
            score,
            label: score_label(score),
        });
    }
}

/// Rapier world under `config` gravity, with the court colliders if `with_room`.
pub fn build_world(config: &GameConfig, with_room: bool) -> RapierWorld {
    let mut world = RapierWorld::new(config.room.gravity());
    if with_room {
        build_room(&mut world, config);
    }
    world
}

fn publish(broadcast_tx: &broadcast::Sender<GameBroadcast>, report: &FrameReport) {
    for (side, outcome) in &report.grabs {
        if let GrabOutcome::Grabbed(ball) = outcome {
            let _ = broadcast_tx.send(GameBroadcast::Grabbed {
                side: *side,
                ball: *ball,
            });
        }
    }
    for (side, outcome) in &report.releases {
        if let ReleaseOutcome::Thrown { ball, velocity } = outcome {
            let _ = broadcast_tx.send(GameBroadcast::Thrown {
                side: *side,
                ball: *ball,
                velocity: *velocity,
            });
        }
    }
    if let Some(ball) = report.spawned {
        let _ = broadcast_tx.send(GameBroadcast::BallSpawned { ball });
    }
}

/// Run the game loop at the configured step rate. Owns all game state.
///
/// Commands are queued and take effect on the next frame. A bot hand, if
/// configured, overwrites its hand's pose every frame. Returns the final
/// score once `Shutdown` arrives, every command sender is gone, or the
/// configured run time has been simulated.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    sim_config: SimConfig,
    game_config: GameConfig,
) -> Result<u64, ConfigError> {
    let world = build_world(&game_config, sim_config.build_room);
    let display = BroadcastDisplay::new(broadcast_tx.clone());
    let mut game = Game::new(game_config, world, display)?;
    if let Some(ball) = game.state().active_ball() {
        let _ = broadcast_tx.send(GameBroadcast::BallSpawned { ball: ball.id });
    }

    let mut input = InputState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(sim_config.rng_seed);
    let mut bot = sim_config
        .bot
        .map(|skill| BotHand::new(sim_config.bot_side, skill, game.config()));
    let max_frames = sim_config.max_frames(game.config().step_dt);

    let tick_duration = Duration::from_secs_f64(game.config().step_dt);
    let mut tick_interval = tokio::time::interval(tick_duration);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        "Game loop started at {:.0} Hz, bot {}",
        game.config().steps_per_second(),
        sim_config.bot.map_or("off", |skill| skill.as_str())
    );

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                if let Some(bot) = bot.as_mut() {
                    bot.drive(&game, &mut input, &mut rng);
                }
                let report = game.step_frame(&mut input);
                publish(&broadcast_tx, &report);

                if max_frames.is_some_and(|limit| game.state().frame >= limit) {
                    tracing::info!("Run time reached after {} frames", game.state().frame);
                    break;
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(GameCommand::HandPose { side, pose }) => input.set_pose(side, pose),
                    Some(GameCommand::Grab { side }) => input.grab(side),
                    Some(GameCommand::Release { side }) => input.release(side),
                    Some(GameCommand::Shutdown) => {
                        tracing::info!("Shutdown requested");
                        break;
                    }
                    None => {
                        tracing::info!("All command senders dropped");
                        break;
                    }
                }
            }
        }
    }

    game.shutdown();
    tracing::info!("Game loop ended, {}", score_label(game.score()));
    Ok(game.score())
}
