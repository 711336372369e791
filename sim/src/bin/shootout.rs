//! Headless shootout: one bot hand plays as fast as the CPU allows.
//!
//! Usage: cargo run --bin shootout -- [OPTIONS]
//!
//! Options:
//!   --seconds S    Simulated play time (default: 60)
//!   --seed N       RNG seed (default: 42)
//!   --skill NAME   steady, casual or wild (default: casual)
//!   --config PATH  JSON game configuration overrides
//!   --no-room      Leave out floor, walls and hoop colliders
//!   --json         Print the summary as JSON

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use hoopshot_core::grab::ReleaseOutcome;
use hoopshot_core::{Game, GameConfig, HandSide, InputState};
use hoopshot_sim::bot::{BotHand, BotSkill};
use hoopshot_sim::game_loop::build_world;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

struct Options {
    seconds: f64,
    seed: u64,
    skill: BotSkill,
    config_path: Option<PathBuf>,
    with_room: bool,
    json: bool,
}

fn parse_args() -> Result<Options> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        seconds: 60.0,
        seed: 42,
        skill: BotSkill::Casual,
        config_path: None,
        with_room: true,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seconds" => {
                i += 1;
                options.seconds = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .context("--seconds needs a number")?;
            }
            "--seed" => {
                i += 1;
                options.seed = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .context("--seed needs an unsigned integer")?;
            }
            "--skill" => {
                i += 1;
                let name = args.get(i).context("--skill needs a name")?;
                options.skill = name.parse().map_err(anyhow::Error::msg)?;
            }
            "--config" => {
                i += 1;
                options.config_path = Some(args.get(i).context("--config needs a path")?.into());
            }
            "--no-room" => options.with_room = false,
            "--json" => options.json = true,
            other => bail!("unknown argument {:?}", other),
        }
        i += 1;
    }

    if !options.seconds.is_finite() || options.seconds <= 0.0 {
        bail!("--seconds must be > 0");
    }
    Ok(options)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    seconds: f64,
    seed: u64,
    skill: &'static str,
    frames: u64,
    throws: u64,
    baskets: u64,
    balls_spawned: u64,
    accuracy: f64,
    wall_clock_ms: u128,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();

    let options = parse_args()?;
    let config = match &options.config_path {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };

    let world = build_world(&config, options.with_room);
    let mut baskets: Vec<u64> = Vec::new();
    let mut game = Game::new(config, world, |score: u64| baskets.push(score))?;
    let mut input = InputState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut bot = BotHand::new(HandSide::Right, options.skill, game.config());

    let frames = (options.seconds / game.config().step_dt).round() as u64;
    let mut throws = 0;
    let mut balls_spawned = 1;
    let started = Instant::now();

    for _ in 0..frames {
        bot.drive(&game, &mut input, &mut rng);
        let report = game.step_frame(&mut input);
        throws += report
            .releases
            .iter()
            .filter(|(_, outcome)| matches!(outcome, ReleaseOutcome::Thrown { .. }))
            .count() as u64;
        if report.spawned.is_some() {
            balls_spawned += 1;
        }
    }
    game.shutdown();

    let score = game.score();
    let summary = Summary {
        seconds: options.seconds,
        seed: options.seed,
        skill: options.skill.as_str(),
        frames,
        throws,
        baskets: score,
        balls_spawned,
        accuracy: if throws > 0 { score as f64 / throws as f64 } else { 0.0 },
        wall_clock_ms: started.elapsed().as_millis(),
    };
    drop(game);
    debug_assert_eq!(baskets.len() as u64, score);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("=== Shootout ({} bot, seed {}) ===", summary.skill, summary.seed);
        println!("Simulated:   {:.1}s ({} frames)", summary.seconds, summary.frames);
        println!("Throws:      {}", summary.throws);
        println!("Baskets:     {}", summary.baskets);
        println!("Accuracy:    {:.0}%", summary.accuracy * 100.0);
        println!("Balls:       {}", summary.balls_spawned);
        println!("Wall clock:  {} ms", summary.wall_clock_ms);
    }
    Ok(())
}
