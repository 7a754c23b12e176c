use super::{Scrambled, SumGame};
use crate::agent::ai::{iterative_deepening_search, Evaluator, SearchLimits, TranspositionTable};
use crate::game_repr::{Color, GameState};

/// Plain minimax without pruning or tables
fn reference_minimax(state: &mut SumGame, depth: u32) -> f64 {
    let moves = state.legal_moves();
    if depth == 0 || moves.is_empty() {
        return Scrambled.evaluate(state);
    }

    let side = state.side_to_move();
    let mut best = match side {
        Color::White => f64::NEG_INFINITY,
        Color::Black => f64::INFINITY,
    };
    for mv in moves {
        state.apply_move(mv);
        let value = reference_minimax(state, depth - 1);
        state.undo_move(mv);
        best = match side {
            Color::White => best.max(value),
            Color::Black => best.min(value),
        };
    }
    best
}

#[test]
fn test_alpha_beta_matches_plain_minimax() {
    for branching in [2, 3, 4] {
        for depth in 1..=5 {
            let mut game = SumGame::new(branching, 6);
            let expected = reference_minimax(&mut game, depth);

            let mut table = TranspositionTable::disabled();
            let result = iterative_deepening_search(&mut game, &mut Scrambled, &mut table, &SearchLimits::depth(depth));
            assert_eq!(result.score, expected, "branching {} depth {}", branching, depth);
            assert_eq!(result.depth, depth);
        }
    }
}

#[test]
fn test_transposition_table_keeps_root_score() {
    for branching in [3, 4] {
        for depth in 1..=5 {
            let mut game = SumGame::new(branching, 6);
            let limits = SearchLimits::depth(depth);

            let mut disabled = TranspositionTable::disabled();
            let without = iterative_deepening_search(&mut game, &mut Scrambled, &mut disabled, &limits);
            let mut enabled = TranspositionTable::new();
            let with = iterative_deepening_search(&mut game, &mut Scrambled, &mut enabled, &limits);

            assert_eq!(with.score, without.score, "branching {} depth {}", branching, depth);
        }
    }
}

#[test]
fn test_transpositions_are_found() {
    let mut game = SumGame::new(3, 6);
    let mut table = TranspositionTable::new();
    let result = iterative_deepening_search(&mut game, &mut Scrambled, &mut table, &SearchLimits::depth(4));

    assert!(result.tt_hits > 0);
    let mut disabled = TranspositionTable::disabled();
    let plain = iterative_deepening_search(&mut game, &mut Scrambled, &mut disabled, &SearchLimits::depth(4));
    assert_eq!(plain.tt_hits, 0);
    assert_eq!(plain.score, result.score);
}

#[test]
fn test_best_move_leads_root_order() {
    let mut game = SumGame::new(4, 6);
    let mut table = TranspositionTable::new();
    let result = iterative_deepening_search(&mut game, &mut Scrambled, &mut table, &SearchLimits::depth(3));

    let (first, eval) = result.root_moves[0];
    assert_eq!(result.best_move, Some(first));
    assert_eq!(eval, result.score);
    assert_eq!(result.principal_variation.first(), Some(&first));
    assert_eq!(game.ply, 0);
}

#[test]
fn test_single_move_game() {
    let mut game = SumGame::new(1, 6);
    let mut table = TranspositionTable::new();
    let result = iterative_deepening_search(&mut game, &mut Scrambled, &mut table, &SearchLimits::depth(5));

    assert_eq!(result.best_move, Some(0));
    assert_eq!(result.depth, 1);
}

#[test]
fn test_search_stops_at_game_end() {
    // two plies left: deeper iterations see the same tree
    let mut game = SumGame::new(3, 2);
    let expected = reference_minimax(&mut game, 2);
    let mut table = TranspositionTable::new();
    let result = iterative_deepening_search(&mut game, &mut Scrambled, &mut table, &SearchLimits::depth(6));
    assert_eq!(result.score, expected);
}
