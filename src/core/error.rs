use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown level: {0}")]
    UnknownLevel(u32),

    #[error("Cell ({row}, {col}) is already revealed")]
    AlreadyRevealed { row: usize, col: usize },

    #[error("Cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("Operation not allowed in phase {0:?}")]
    InvalidPhase(crate::session::Phase),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Corrupted progress record: {0}")]
    CorruptedProgress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
