// Flat Monte Carlo search with UCB1 selection over the root moves
//
// Every root move keeps win statistics. Each playout picks the root move with
// the best UCB1 score for the side to move, plays random moves from there and
// credits the result. Rollouts are bounded: once the ply budget runs out the
// material balance decides the game.

use super::evaluation::Evaluator;
use crate::game_repr::{Color, GameState, GameOutcome};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// UCB1 exploration constant
pub const DEFAULT_EXPLORATION: f64 = 1.5;
/// Random plies played before a rollout is resolved by material
pub const DEFAULT_ROLLOUT_PLIES: usize = 200;

/// Statistics of one root move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playout {
    /// Index of the move in the root's legal move list
    pub move_index: usize,
    pub games: u32,
    pub white_wins: u32,
    pub black_wins: u32,
    /// Observed win rate for the side to move, negated when Black moves
    pub win_rate: f64,
    /// UCB1 score; infinite for the side to move until visited
    pub score: f64,
}

impl Playout {
    fn new(move_index: usize, side_to_move: Color) -> Self {
        let mut playout = Self {
            move_index,
            games: 0,
            white_wins: 0,
            black_wins: 0,
            win_rate: 0.0,
            score: 0.0,
        };
        playout.set_score(side_to_move, 0, DEFAULT_EXPLORATION);
        playout
    }

    fn add_result(&mut self, result: i8) {
        self.games += 1;
        match result {
            1 => self.white_wins += 1,
            -1 => self.black_wins += 1,
            _ => {}
        }
    }

    /// Recompute the UCB1 score after `total_games` playouts in all.
    fn set_score(&mut self, side_to_move: Color, total_games: usize, exploration: f64) {
        if self.games == 0 || total_games == 0 {
            self.score = match side_to_move {
                Color::White => f64::INFINITY,
                Color::Black => f64::NEG_INFINITY,
            };
            return;
        }

        let n = self.games as f64;
        let bonus = exploration * ((total_games as f64).ln() / n).sqrt();
        match side_to_move {
            Color::White => {
                self.win_rate = self.white_wins as f64 / n;
                self.score = self.win_rate + bonus;
            }
            Color::Black => {
                let rate = self.black_wins as f64 / n;
                self.win_rate = -rate;
                self.score = -(rate + bonus);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MctsResult<M> {
    pub best_move: Option<M>,
    /// Root moves with their statistics, best for White first
    pub playouts: Vec<(M, Playout)>,
}

pub struct MctsSearcher {
    rng: StdRng,
    exploration: f64,
    rollout_plies: usize,
}

impl MctsSearcher {
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, DEFAULT_EXPLORATION, DEFAULT_ROLLOUT_PLIES)
    }

    pub fn with_params(seed: u64, exploration: f64, rollout_plies: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            exploration,
            rollout_plies,
        }
    }

    /// Run `total_playouts` rollouts from `state` and pick the root move with
    /// the best win rate for the side to move. `material` resolves rollouts
    /// that hit the ply budget.
    pub fn search<S, E>(&mut self, state: &S, total_playouts: usize, material: &mut E) -> MctsResult<S::Move>
    where
        S: GameState + Clone,
        E: Evaluator<S> + ?Sized,
    {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return MctsResult {
                best_move: None,
                playouts: Vec::new(),
            };
        }

        let side = state.side_to_move();
        let mut playouts: Vec<Playout> = (0..moves.len()).map(|i| Playout::new(i, side)).collect();
        let pick = |len: usize| match side {
            Color::White => 0,
            Color::Black => len - 1,
        };

        for n in 0..total_playouts {
            playouts.sort_by(|a, b| b.score.total_cmp(&a.score));
            let chosen = pick(playouts.len());
            let result = self.rollout(state, moves[playouts[chosen].move_index], material);
            playouts[chosen].add_result(result);
            for playout in playouts.iter_mut() {
                playout.set_score(side, n + 1, self.exploration);
            }
        }

        playouts.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
        let best_move = Some(moves[playouts[pick(playouts.len())].move_index]);

        for playout in &playouts {
            debug!(
                "move {} score {:.3} win rate {:.3} ({}/{}/{})",
                moves[playout.move_index],
                playout.score,
                playout.win_rate,
                playout.white_wins,
                playout.black_wins,
                playout.games
            );
        }

        MctsResult {
            best_move,
            playouts: playouts.into_iter().map(|p| (moves[p.move_index], p)).collect(),
        }
    }

    /// Play `first` and then random moves on a copy of `state`. Returns +1 for
    /// a White win, -1 for a Black win, 0 for a draw.
    fn rollout<S, E>(&mut self, state: &S, first: S::Move, material: &mut E) -> i8
    where
        S: GameState + Clone,
        E: Evaluator<S> + ?Sized,
    {
        let mut scratch = state.clone();
        scratch.apply_move(first);

        for _ in 0..self.rollout_plies {
            if let Some(outcome) = scratch.outcome() {
                return outcome.score();
            }
            let moves = scratch.legal_moves();
            if moves.is_empty() {
                return GameOutcome::Draw.score();
            }
            let mv = moves[self.rng.gen_range(0..moves.len())];
            scratch.apply_move(mv);
        }

        let balance = material.evaluate(&scratch);
        if balance > 0.0 {
            1
        } else if balance < 0.0 {
            -1
        } else {
            0
        }
    }
}
