//! Player trait and the game driver that pits two players against each other.
//!
//! A player is anything that can answer "which move here?": the engine
//! session, a random mover, or a test double. Players are handed the current
//! position on every request and keep no board of their own.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chess_mind::agent::player::{play_game, RandomPlayer};
//! use chess_mind::game_repr::Position;
//!
//! let mut white = RandomPlayer::new(1);
//! let mut black = RandomPlayer::new(2);
//! let record = play_game(&mut white, &mut black, Position::default(), 200);
//! println!("{} after {} plies", record.outcome.name(), record.plies);
//! ```

use crate::agent::ai::{check_termination, SearchLimits};
use crate::engine::Engine;
use crate::game_repr::{ChessMove, Color, GameOutcome, GameState, Position};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Moves and result of a finished game
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Moves in UCI notation, in the order they were played
    pub moves: Vec<String>,
    pub outcome: GameOutcome,
    pub plies: usize,
}

/// Trait for entities that can provide chess moves.
///
/// Only `get_move()` must be implemented. The notifications default to doing
/// nothing.
pub trait Player {
    /// Request the next move for the side to move in `position`.
    ///
    /// # Returns
    ///
    /// * `Some(ChessMove)` - The chosen move
    /// * `None` - The player has no move to offer, which the driver treats as
    ///   a resignation
    fn get_move(&mut self, position: &Position) -> Option<ChessMove>;

    /// Notification that the opponent just played `mv`.
    fn opponent_moved(&mut self, _mv: ChessMove) {}

    /// Notification that the game is over.
    fn game_ended(&mut self, _outcome: GameOutcome) {}

    fn name(&self) -> &str {
        "Player"
    }
}

/// The engine session as a player
pub struct EnginePlayer {
    engine: Engine,
    limits: SearchLimits,
    name: String,
}

impl EnginePlayer {
    pub fn new(engine: Engine, name: String) -> Self {
        let limits = engine.config().search.limits();
        Self { engine, limits, name }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }
}

impl Player for EnginePlayer {
    fn get_move(&mut self, position: &Position) -> Option<ChessMove> {
        self.engine.reset_to(position.clone());
        match self.engine.select_move(&self.limits) {
            Ok(uci) if uci.is_empty() => None,
            Ok(uci) => position.parse_move(&uci).ok(),
            Err(err) => {
                warn!("[{}] move selection failed: {}", self.name, err);
                None
            }
        }
    }

    fn game_ended(&mut self, outcome: GameOutcome) {
        info!("[{}] game over: {}", self.name, outcome.name());
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn get_move(&mut self, position: &Position) -> Option<ChessMove> {
        let moves = position.legal_moves();
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.gen_range(0..moves.len())])
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Play a game from `start` until it ends or `max_plies` moves were made,
/// which counts as a draw. A player that offers no move, or an illegal one,
/// loses.
pub fn play_game(white: &mut dyn Player, black: &mut dyn Player, start: Position, max_plies: usize) -> GameRecord {
    let mut pos = start;
    let mut moves = Vec::new();

    let outcome = loop {
        if let Some(outcome) = check_termination(&pos, moves.len() >= max_plies) {
            break outcome;
        }

        let side = pos.side_to_move();
        let (mover, waiting): (&mut dyn Player, &mut dyn Player) = match side {
            Color::White => (&mut *white, &mut *black),
            Color::Black => (&mut *black, &mut *white),
        };

        let Some(mv) = mover.get_move(&pos) else {
            info!("{} resigns", mover.name());
            break GameOutcome::from_winner(!side);
        };
        if !pos.legal_moves().contains(&mv) {
            warn!("{} played illegal move {}", mover.name(), mv);
            break GameOutcome::from_winner(!side);
        }

        pos.apply_move(mv);
        waiting.opponent_moved(mv);
        moves.push(mv.to_string());
    };

    white.game_ended(outcome);
    black.game_ended(outcome);
    info!(
        "{} vs {}: {} after {} plies",
        white.name(),
        black.name(),
        outcome.name(),
        moves.len()
    );

    GameRecord {
        plies: moves.len(),
        moves,
        outcome,
    }
}
