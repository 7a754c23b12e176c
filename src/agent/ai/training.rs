// Self-play training
//
// The engine plays itself with the record-book strategy. Decisive games train
// the network toward the result on every position of the game; the network
// and the record book are written to the output directory after each game.

use super::features::extract_features;
use super::record_book::check_termination;
use crate::agent::player::GameRecord;
use crate::config::TrainingConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::game_repr::{ChessMove, GameOutcome, GameState, Position};
use crate::neural::{Network, NetworkError};
use log::{debug, info};
use std::fs;

/// Train toward `result` on `start` and on the position after every move.
pub fn train_on_game(network: &mut Network, start: &Position, moves: &[ChessMove], result: f64) -> std::result::Result<(), NetworkError> {
    let mut pos = start.clone();
    train_position(network, &pos, result)?;
    for &mv in moves {
        pos.apply_move(mv);
        train_position(network, &pos, result)?;
    }
    Ok(())
}

fn train_position(network: &mut Network, pos: &Position, result: f64) -> std::result::Result<(), NetworkError> {
    network.feed_forward(&extract_features(pos))?;
    network.back_prop(&[result])
}

pub struct SelfPlayTrainer {
    engine: Engine,
    config: TrainingConfig,
}

impl SelfPlayTrainer {
    pub fn new(engine: Engine) -> Self {
        let config = engine.config().training.clone();
        Self { engine, config }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Play one game against itself, train on it and write the network and
    /// record book as `network_<id>.txt` and `book_<id>.txt`.
    pub fn play_game(&mut self, id: usize) -> Result<GameRecord> {
        self.engine.new_game();
        let start = self.engine.position().clone();
        let ply_cap = 2 * self.config.move_limit;
        let mut moves = Vec::new();

        let outcome = loop {
            if let Some(outcome) = check_termination(self.engine.position(), moves.len() >= ply_cap) {
                break outcome;
            }
            let Some(mv) = self.engine.record_move() else {
                break GameOutcome::Draw;
            };
            debug!(
                "game {} move {}: {} ({:.3})",
                id,
                moves.len() / 2 + 1,
                mv,
                self.engine.current_evaluation()
            );
            self.engine.play(mv);
            moves.push(mv);
        };

        if self.config.train_network && outcome.is_decisive() {
            train_on_game(self.engine.network_mut(), &start, &moves, f64::from(outcome.score()))?;
        }

        fs::create_dir_all(&self.config.output_dir)?;
        if self.config.train_network {
            self.engine
                .save_network(self.config.output_dir.join(format!("network_{}.txt", id)))?;
        }
        self.engine
            .save_record_book(self.config.output_dir.join(format!("book_{}.txt", id)))?;

        info!(
            "game {}: {} after {} moves, record book has {} positions",
            id,
            outcome.name(),
            (moves.len() + 1) / 2,
            self.engine.record_book().len()
        );

        Ok(GameRecord {
            moves: moves.iter().map(|mv| mv.to_string()).collect(),
            outcome,
            plies: moves.len(),
        })
    }

    /// Play the configured number of games.
    pub fn run(&mut self) -> Result<Vec<GameRecord>> {
        (0..self.config.games).map(|id| self.play_game(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_training_moves_prediction_toward_result() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let mut network = engine.network().clone();
        let start = Position::default();
        let moves: Vec<ChessMove> = ["e2e4", "e7e5", "g1f3"]
            .iter()
            .scan(start.clone(), |pos, uci| {
                let mv = pos.parse_move(uci).ok()?;
                pos.apply_move(mv);
                Some(mv)
            })
            .collect();
        assert_eq!(moves.len(), 3);

        let features = extract_features(&start);
        let before = network.predict(&features).unwrap();
        for _ in 0..50 {
            train_on_game(&mut network, &start, &moves, 1.0).unwrap();
        }
        let after = network.predict(&features).unwrap();
        assert!(after > before, "prediction {} did not move toward 1 from {}", after, before);
        assert!((1.0 - after).abs() < (1.0 - before).abs());
    }

    fn small_config(dir: &std::path::Path) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.book.enabled = false;
        config.record.walks_per_move = 8;
        config.training.move_limit = 3;
        config.training.games = 2;
        config.training.output_dir = dir.to_path_buf();
        config
    }

    #[test]
    fn test_self_play_game_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = SelfPlayTrainer::new(Engine::new(small_config(dir.path())).unwrap());
        let record = trainer.play_game(0).unwrap();

        assert!(record.plies <= 6);
        assert_eq!(record.moves.len(), record.plies);
        assert!(Position::from_moves(None, &record.moves).is_ok());
        if record.plies == 6 {
            assert_eq!(record.outcome, GameOutcome::Draw);
        }

        assert!(dir.path().join("network_0.txt").exists());
        let book = crate::agent::ai::RecordBook::load(dir.path().join("book_0.txt")).unwrap();
        assert_eq!(&book, trainer.engine().record_book());
        assert!(!book.is_empty());
    }

    #[test]
    fn test_run_plays_configured_games() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.training.train_network = false;
        let mut trainer = SelfPlayTrainer::new(Engine::new(config).unwrap());
        let records = trainer.run().unwrap();

        assert_eq!(records.len(), 2);
        assert!(dir.path().join("book_1.txt").exists());
        assert!(!dir.path().join("network_0.txt").exists());
    }
}
