use anyhow::{Context, Result};
use hoopshot_core::score::score_label;
use hoopshot_sim::config::SimConfig;
use hoopshot_sim::game_loop::{run_game_loop, GameBroadcast, GameCommand};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let sim_config = SimConfig::from_env();
    if let Err(e) = sim_config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    let game_config = sim_config
        .load_game_config()
        .context("loading game configuration")?;

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(sim_config.command_buffer);
    let (broadcast_tx, mut broadcast_rx) =
        broadcast::channel::<GameBroadcast>(sim_config.broadcast_buffer);

    // Scoreboard: print every score change
    tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(GameBroadcast::ScoreChanged { label, .. }) => println!("{}", label),
                Ok(other) => tracing::debug!("{:?}", other),
                Err(RecvError::Lagged(n)) => tracing::warn!("Scoreboard lagged by {} messages", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let shutdown_tx = game_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(GameCommand::Shutdown).await;
        }
    });

    println!("Hoopshot running, Ctrl-C to stop");
    let score = tokio::spawn(run_game_loop(game_rx, broadcast_tx, sim_config, game_config))
        .await
        .context("game loop task failed")??;
    drop(game_tx);

    println!("Final {}", score_label(score));
    Ok(())
}
