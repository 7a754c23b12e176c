use crate::neural::NetworkError;
use thiserror::Error;

/// Errors surfaced by the engine session and its file formats.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("book line {line}: {message}")]
    Book { line: usize, message: String },

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
