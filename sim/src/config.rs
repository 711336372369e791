use std::path::PathBuf;

use hoopshot_core::{ConfigError, GameConfig, HandSide};

use crate::bot::BotSkill;

/// Runtime settings for the game loop binaries
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub rng_seed: u64,
    /// Skill of the scripted hand, `None` for input from commands only
    pub bot: Option<BotSkill>,
    pub bot_side: HandSide,
    /// Build floor, walls and hoop colliders
    pub build_room: bool,
    /// Stop after this much simulated time
    pub run_seconds: Option<f64>,
    /// JSON file with `GameConfig` overrides
    pub config_path: Option<PathBuf>,
    pub command_buffer: usize,
    pub broadcast_buffer: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            bot: Some(BotSkill::Steady),
            bot_side: HandSide::Right,
            build_room: true,
            run_seconds: None,
            config_path: None,
            command_buffer: 256,
            broadcast_buffer: 64,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `HOOPSHOT_CONFIG`, `HOOPSHOT_SEED`,
    /// `HOOPSHOT_BOT` (`off` or a skill name) and `HOOPSHOT_SECONDS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("HOOPSHOT_CONFIG") {
            config.config_path = Some(PathBuf::from(path));
        }
        if let Ok(seed) = std::env::var("HOOPSHOT_SEED") {
            match seed.parse() {
                Ok(seed) => config.rng_seed = seed,
                Err(_) => tracing::warn!("ignoring HOOPSHOT_SEED={:?}, not a u64", seed),
            }
        }
        if let Ok(bot) = std::env::var("HOOPSHOT_BOT") {
            if bot.eq_ignore_ascii_case("off") {
                config.bot = None;
            } else {
                match bot.parse() {
                    Ok(skill) => config.bot = Some(skill),
                    Err(e) => tracing::warn!("ignoring HOOPSHOT_BOT: {}", e),
                }
            }
        }
        if let Ok(seconds) = std::env::var("HOOPSHOT_SECONDS") {
            match seconds.parse() {
                Ok(seconds) => config.run_seconds = Some(seconds),
                Err(_) => tracing::warn!("ignoring HOOPSHOT_SECONDS={:?}", seconds),
            }
        }
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(seconds) = self.run_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err("run_seconds must be finite and > 0".to_string());
            }
        }
        if self.command_buffer == 0 {
            return Err("command_buffer must be > 0".to_string());
        }
        if self.broadcast_buffer == 0 {
            return Err("broadcast_buffer must be > 0".to_string());
        }
        Ok(())
    }

    /// The game tuning: the JSON file at `config_path`, or defaults.
    pub fn load_game_config(&self) -> Result<GameConfig, ConfigError> {
        match &self.config_path {
            Some(path) => GameConfig::load(path),
            None => Ok(GameConfig::default()),
        }
    }

    /// Frame budget for `run_seconds` at the given step.
    pub fn max_frames(&self, step_dt: f64) -> Option<u64> {
        self.run_seconds
            .map(|seconds| (seconds / step_dt).round().max(1.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sim_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_run_time_invalid() {
        let config = SimConfig {
            run_seconds: Some(0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_buffer_invalid() {
        let config = SimConfig {
            command_buffer: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_frames_rounds_to_whole_steps() {
        let config = SimConfig {
            run_seconds: Some(2.0),
            ..Default::default()
        };
        assert_eq!(config.max_frames(1.0 / 60.0), Some(120));
        assert_eq!(SimConfig::default().max_frames(1.0 / 60.0), None);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let config = SimConfig {
            config_path: Some(PathBuf::from("/nonexistent/hoopshot.json")),
            ..Default::default()
        };
        assert!(matches!(config.load_game_config(), Err(ConfigError::Io(_))));
    }
}
