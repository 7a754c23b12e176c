// Searcher tests on a small synthetic game
//
// `SumGame` has a fixed branching factor: each move adds its index to the
// running sum of the player who made it. Different move orders reach the same
// sums, so the game has plenty of transpositions, and leaf scores are a
// deterministic scramble of the two sums.

mod mcts_tests;
mod search_tests;

use crate::agent::ai::Evaluator;
use crate::game_repr::{Color, GameState, MoveList};

#[derive(Debug, Clone)]
pub(super) struct SumGame {
    branching: u8,
    height: u32,
    ply: u32,
    white_sum: u32,
    black_sum: u32,
}

impl SumGame {
    pub(super) fn new(branching: u8, height: u32) -> Self {
        Self {
            branching,
            height,
            ply: 0,
            white_sum: 0,
            black_sum: 0,
        }
    }
}

impl GameState for SumGame {
    type Move = u8;

    fn legal_moves(&self) -> MoveList<u8> {
        if self.ply >= self.height {
            return MoveList::new();
        }
        (0..self.branching).collect()
    }

    fn apply_move(&mut self, mv: u8) {
        match self.side_to_move() {
            Color::White => self.white_sum += u32::from(mv),
            Color::Black => self.black_sum += u32::from(mv),
        }
        self.ply += 1;
    }

    fn undo_move(&mut self, mv: u8) {
        self.ply -= 1;
        match self.side_to_move() {
            Color::White => self.white_sum -= u32::from(mv),
            Color::Black => self.black_sum -= u32::from(mv),
        }
    }

    fn position_hash(&self) -> u64 {
        (u64::from(self.ply) << 48) | (u64::from(self.white_sum) << 24) | u64::from(self.black_sum)
    }

    fn side_to_move(&self) -> Color {
        if self.ply % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    fn is_checkmate(&self) -> bool {
        false
    }

    fn is_stalemate(&self) -> bool {
        false
    }

    fn is_rule_draw(&self) -> bool {
        false
    }

    fn is_capture(&self, _mv: u8) -> bool {
        false
    }

    fn move_target(&self, mv: u8) -> u8 {
        mv
    }

    fn to_canonical_string(&self) -> String {
        format!("{} {} {}", self.ply, self.white_sum, self.black_sum)
    }
}

/// Pseudo-random score in [-10, 10] fixed by the position
pub(super) struct Scrambled;

impl Evaluator<SumGame> for Scrambled {
    fn evaluate(&mut self, state: &SumGame) -> f64 {
        let mut h = state.position_hash().wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 33;
        h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
        h ^= h >> 33;
        ((h % 2001) as f64 - 1000.0) / 100.0
    }

    fn name(&self) -> &'static str {
        "scrambled"
    }
}

/// White's sum minus Black's
pub(super) struct Difference;

impl Evaluator<SumGame> for Difference {
    fn evaluate(&mut self, state: &SumGame) -> f64 {
        f64::from(state.white_sum) - f64::from(state.black_sum)
    }

    fn name(&self) -> &'static str {
        "difference"
    }
}
