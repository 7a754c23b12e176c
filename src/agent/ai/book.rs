// Opening book built from a list of games
//
// Each line of the source is one game as UCI moves from the start position.
// The book maps the hash of every position reached in the first plies of those
// games to the moves played from it.

use crate::error::Result;
use crate::game_repr::{ChessMove, GameState, Position};
use log::{info, warn};
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    moves: HashMap<u64, Vec<ChessMove>>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from one game per line, keeping at most `max_plies` moves
    /// of each game. A game stops at its first unreadable or illegal move.
    pub fn from_games(text: &str, max_plies: usize) -> OpeningBook {
        let mut book = OpeningBook::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let moves: Vec<&str> = line.split_whitespace().collect();
            if let Err(err) = book.add_game(&moves, max_plies) {
                warn!("opening book line {}: {}", i + 1, err);
            }
        }
        book
    }

    pub fn load<P: AsRef<Path>>(path: P, max_plies: usize) -> Result<OpeningBook> {
        let text = fs::read_to_string(path.as_ref())?;
        let book = Self::from_games(&text, max_plies);
        info!("loaded opening book {} with {} positions", path.as_ref().display(), book.len());
        Ok(book)
    }

    /// Enter the first `max_plies` moves of a game. Moves before a bad one stay
    /// in the book.
    pub fn add_game<S: AsRef<str>>(&mut self, moves: &[S], max_plies: usize) -> Result<()> {
        let mut pos = Position::default();
        for uci in moves.iter().take(max_plies) {
            let mv = pos.parse_move(uci.as_ref())?;
            let entry = self.moves.entry(pos.position_hash()).or_default();
            if !entry.contains(&mv) {
                entry.push(mv);
            }
            pos.apply_move(mv);
        }
        Ok(())
    }

    /// A uniformly chosen book move for `pos`, if the book knows the position.
    pub fn probe<R: Rng>(&self, pos: &Position, rng: &mut R) -> Option<ChessMove> {
        let moves = self.moves_for(pos);
        if moves.is_empty() {
            return None;
        }
        Some(moves[rng.gen_range(0..moves.len())])
    }

    pub fn moves_for(&self, pos: &Position) -> &[ChessMove] {
        self.moves
            .get(&pos.position_hash())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of positions in the book
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
