pub mod player;
pub use player::*;

pub mod ai;
pub use ai::{Difficulty, SearchLimits, SearchResult, SearchStrategy, SelfPlayTrainer, TranspositionTable};
