// AI Agent - move selection
//
// Three searchers share the `GameState` and `Evaluator` traits:
//
// - Alpha-beta minimax with iterative deepening over a persistent move tree,
//   a transposition table and capture-square quiescence at the frontier
// - Flat Monte Carlo search with UCB1 selection and bounded random rollouts
// - Record-book tree walks that back up running-mean evaluations
//
// Leaf scores come from a handcrafted evaluator, the neural network or a blend
// of both. An opening book built from game lists is consulted before search.

mod ai_type;
mod book;
mod difficulty;
mod evaluation;
pub mod features;
mod mcts;
mod minimax;
mod move_tree;
mod network_evaluator;
mod record_book;
mod search;
mod training;
mod transposition_table;

#[cfg(test)]
mod tests;

pub use ai_type::SearchStrategy;
pub use book::OpeningBook;
pub use difficulty::{Difficulty, SearchLimits};
pub use evaluation::{
    material_balance, score_leaf, terminal_score, Evaluator, EvaluatorKind, MaterialEvaluator, StaticEvaluator,
    MATE_SCORE,
};
pub use mcts::{MctsResult, MctsSearcher, Playout, DEFAULT_EXPLORATION, DEFAULT_ROLLOUT_PLIES};
pub use move_tree::{populate_next_moves, MoveNode};
pub use network_evaluator::{check_evaluation_shape, BlendEvaluator, NetworkEvaluator, SelectedEvaluator};
pub use record_book::{check_termination, pick_next_move, search_subtree, Record, RecordBook};
pub use search::{iterative_deepening_search, SearchResult};
pub use training::{train_on_game, SelfPlayTrainer};
pub use transposition_table::{NodeType, TranspositionTable, TranspositionTableEntry};
