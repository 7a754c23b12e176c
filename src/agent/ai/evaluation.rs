// Position evaluation
//
// All scores are from White's point of view: positive favours White, negative
// favours Black, in units of pawns. Terminal positions are scored by
// `score_leaf` before an evaluator is ever consulted.

use crate::game_repr::{Color, GameState, Piece, Position};
use serde::{Deserialize, Serialize};

/// Score of a checkmate. Positive when Black is mated.
pub const MATE_SCORE: f64 = 10_000.0;

// Material values in pawns
const PAWN_VALUE: f64 = 1.0;
const KNIGHT_VALUE: f64 = 3.0;
const BISHOP_VALUE: f64 = 3.2;
const ROOK_VALUE: f64 = 5.0;
const QUEEN_VALUE: f64 = 9.0;

/// Scores non-terminal positions of some game.
pub trait Evaluator<S: GameState> {
    /// White-positive score of `state`.
    fn evaluate(&mut self, state: &S) -> f64;

    fn name(&self) -> &'static str;
}

/// Which evaluator an engine session searches with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Material,
    #[default]
    Static,
    Network,
    /// Weighted sum of the static and network evaluators
    Blend,
}

/// Score for a game that is already over, None while it goes on.
pub fn terminal_score<S: GameState>(state: &S) -> Option<f64> {
    if state.is_checkmate() {
        Some(match state.side_to_move() {
            Color::White => -MATE_SCORE,
            Color::Black => MATE_SCORE,
        })
    } else if state.is_draw() {
        Some(0.0)
    } else {
        None
    }
}

/// Terminal score if the game is over, otherwise the evaluator's verdict.
pub fn score_leaf<S, E>(state: &S, evaluator: &mut E) -> f64
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
{
    match terminal_score(state) {
        Some(score) => score,
        None => evaluator.evaluate(state),
    }
}

fn piece_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0.0,
    }
}

/// White material minus Black material
pub fn material_balance(pos: &Position) -> f64 {
    [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
        .iter()
        .map(|&piece| {
            let diff = pos.piece_count(piece, Color::White) as f64 - pos.piece_count(piece, Color::Black) as f64;
            diff * piece_value(piece)
        })
        .sum()
}

fn sign(color: Color) -> f64 {
    match color {
        Color::White => 1.0,
        Color::Black => -1.0,
    }
}

/// Material count only. Used as the rollout verdict by MCTS.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl Evaluator<Position> for MaterialEvaluator {
    fn evaluate(&mut self, pos: &Position) -> f64 {
        material_balance(pos)
    }

    fn name(&self) -> &'static str {
        "material"
    }
}

/// Hand-tuned evaluation: material plus a few positional terms.
#[derive(Debug, Clone, Copy)]
pub struct StaticEvaluator {
    /// Penalty for the side to move being in check
    pub check_penalty: f64,
    /// Bonus per castling right still held
    pub castle_right_bonus: f64,
    /// Bonus per pawn on its seventh rank
    pub seventh_rank_pawn_bonus: f64,
}

impl Default for StaticEvaluator {
    fn default() -> Self {
        Self {
            check_penalty: 0.5,
            castle_right_bonus: 0.25,
            seventh_rank_pawn_bonus: 0.6,
        }
    }
}

impl Evaluator<Position> for StaticEvaluator {
    fn evaluate(&mut self, pos: &Position) -> f64 {
        let mut score = material_balance(pos);

        if pos.is_in_check() {
            score -= sign(pos.side_to_move()) * self.check_penalty;
        }

        for color in [Color::White, Color::Black] {
            let rights = pos.can_castle_kingside(color) as u32 + pos.can_castle_queenside(color) as u32;
            score += sign(color) * rights as f64 * self.castle_right_bonus;
            score += sign(color) * pos.pawns_on_seventh(color) as f64 * self.seventh_rank_pawn_bonus;
        }

        score
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let start = Position::default();
        assert_eq!(MaterialEvaluator.evaluate(&start), 0.0);
        assert_eq!(StaticEvaluator::default().evaluate(&start), 0.0);
    }

    #[test]
    fn test_material_counts_missing_queen() {
        let p = pos("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(MaterialEvaluator.evaluate(&p), QUEEN_VALUE);
    }

    #[test]
    fn test_static_is_color_symmetric() {
        // Mirror images with colors swapped score as negatives of each other
        let white = pos("4k3/8/8/8/8/8/1P6/R3K3 w Q - 0 1");
        let black = pos("r3k3/1p6/8/8/8/8/8/4K3 b q - 0 1");
        let mut eval = StaticEvaluator::default();
        assert_eq!(eval.evaluate(&white), -eval.evaluate(&black));
        assert!(eval.evaluate(&white) > 0.0);
    }

    #[test]
    fn test_seventh_rank_pawn_bonus() {
        let advanced = pos("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let home = pos("4k3/8/8/8/8/8/1P6/4K3 w - - 0 1");
        let mut eval = StaticEvaluator::default();
        let gap = eval.evaluate(&advanced) - eval.evaluate(&home);
        assert!((gap - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_check_penalizes_side_to_move() {
        let checked = pos("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1");
        let quiet = pos("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1");
        let mut eval = StaticEvaluator::default();
        assert!(eval.evaluate(&checked) < eval.evaluate(&quiet));
    }

    #[test]
    fn test_score_leaf_handles_terminal_positions() {
        // Fool's mate: White is mated
        let mated = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(score_leaf(&mated, &mut MaterialEvaluator), -MATE_SCORE);

        let stalemate = pos("k7/8/1Q6/8/8/8/8/K7 b - - 0 1");
        assert_eq!(score_leaf(&stalemate, &mut MaterialEvaluator), 0.0);

        let start = Position::default();
        assert_eq!(terminal_score(&start), None);
    }
}
