pub mod agent;
pub mod config;
pub mod engine;
pub mod error;
pub mod game_repr;
pub mod neural;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
