use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid action index {index}, expected 0..{action_size}")]
    InvalidAction { index: usize, action_size: usize },

    #[error("episode is over, reset before stepping again")]
    NeedsReset,

    #[error("environment is closed")]
    Closed,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Environment error: {0}")]
    EnvError(#[from] Box<dyn std::error::Error + Send + Sync>),
}
