// Game state abstraction consumed by the searchers
//
// Every searcher in `agent::ai` is written against the `GameState` trait so the
// same alpha-beta, MCTS and record-tree code runs on real chess positions and on
// the small synthetic trees used by the tests.

mod position;

pub use position::{Position, START_FEN};

pub use chess::{ChessMove, Color, Piece};

use smallvec::SmallVec;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Fixed-capacity move buffer. Chess positions rarely exceed 64 legal moves;
/// larger lists spill to the heap.
pub type MoveList<M> = SmallVec<[M; 64]>;

/// Final result of a game, from White's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameOutcome {
    /// +1 for a White win, -1 for a Black win, 0 for a draw.
    pub fn score(self) -> i8 {
        match self {
            GameOutcome::WhiteWins => 1,
            GameOutcome::BlackWins => -1,
            GameOutcome::Draw => 0,
        }
    }

    pub fn is_decisive(self) -> bool {
        self != GameOutcome::Draw
    }

    /// Outcome of a game in which `winner` delivered mate.
    pub fn from_winner(winner: Color) -> Self {
        match winner {
            Color::White => GameOutcome::WhiteWins,
            Color::Black => GameOutcome::BlackWins,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameOutcome::WhiteWins => "white",
            GameOutcome::BlackWins => "black",
            GameOutcome::Draw => "draw",
        }
    }
}

/// A mutable two-player game state with reversible moves.
///
/// Implementations must guarantee that `undo_move(mv)` right after
/// `apply_move(mv)` restores the exact previous state, including the hash.
pub trait GameState {
    type Move: Copy + Eq + Hash + Debug + Display;

    /// All legal moves for the side to move.
    fn legal_moves(&self) -> MoveList<Self::Move>;

    fn apply_move(&mut self, mv: Self::Move);

    /// Reverts the most recent `apply_move`, which must have been `mv`.
    fn undo_move(&mut self, mv: Self::Move);

    /// 64-bit position identity (Zobrist style).
    fn position_hash(&self) -> u64;

    fn side_to_move(&self) -> Color;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    /// Draws by rule: fifty-move rule, repetition, insufficient material.
    fn is_rule_draw(&self) -> bool;

    fn is_draw(&self) -> bool {
        self.is_rule_draw() || self.is_stalemate()
    }

    /// Whether `mv` captures a piece in the current state.
    fn is_capture(&self, mv: Self::Move) -> bool;

    /// Destination square index of `mv`.
    fn move_target(&self, mv: Self::Move) -> u8;

    /// Human-readable key used by the record book.
    fn to_canonical_string(&self) -> String;

    /// `Some` once the game is over. Checkmate takes precedence over rule draws.
    fn outcome(&self) -> Option<GameOutcome> {
        if self.is_checkmate() {
            Some(GameOutcome::from_winner(!self.side_to_move()))
        } else if self.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}
