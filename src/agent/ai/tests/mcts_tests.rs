use super::{Difference, Scrambled, SumGame};
use crate::agent::ai::MctsSearcher;

#[test]
fn test_every_root_move_gets_a_rollout() {
    for branching in [2, 5, 9] {
        let game = SumGame::new(branching, 8);
        let mut searcher = MctsSearcher::with_params(4, 1.5, 4);
        let result = searcher.search(&game, usize::from(branching) * 3, &mut Scrambled);

        assert_eq!(result.playouts.len(), usize::from(branching));
        assert!(result.playouts.iter().all(|(_, p)| p.games >= 1));
        let total: u32 = result.playouts.iter().map(|(_, p)| p.games).sum();
        assert_eq!(total, u32::from(branching) * 3);
    }
}

#[test]
fn test_winning_moves_are_preferred() {
    // no random plies: the move itself decides the material sign
    let game = SumGame::new(3, 8);
    let mut searcher = MctsSearcher::with_params(1, 1.5, 0);
    let result = searcher.search(&game, 30, &mut Difference);

    let best = result.best_move.unwrap();
    assert_ne!(best, 0);
    let (_, zero) = result.playouts.iter().find(|(mv, _)| *mv == 0).unwrap();
    assert_eq!(zero.white_wins, 0);
    assert_eq!(zero.win_rate, 0.0);
}

#[test]
fn test_black_minimizes() {
    let mut game = SumGame::new(3, 8);
    crate::game_repr::GameState::apply_move(&mut game, 0);
    let mut searcher = MctsSearcher::with_params(1, 1.5, 0);
    let result = searcher.search(&game, 30, &mut Difference);

    let best = result.best_move.unwrap();
    assert_ne!(best, 0);
    let (_, chosen) = result.playouts.last().unwrap();
    assert_eq!(chosen.black_wins, chosen.games);
}

#[test]
fn test_single_move_game() {
    let game = SumGame::new(1, 8);
    let result = MctsSearcher::new(2).search(&game, 10, &mut Scrambled);
    assert_eq!(result.best_move, Some(0));
    assert_eq!(result.playouts[0].1.games, 10);
}

#[test]
fn test_finished_game_has_no_move() {
    let game = SumGame::new(3, 0);
    let result = MctsSearcher::new(2).search(&game, 10, &mut Scrambled);
    assert!(result.best_move.is_none());
}
