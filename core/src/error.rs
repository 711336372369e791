use thiserror::Error;

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig).
///
/// Nothing in the frame loop is fallible; configuration is the only place
/// the core can refuse to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
