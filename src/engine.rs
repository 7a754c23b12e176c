//! Engine session: the position being played plus everything the searchers
//! need between moves.
//!
//! The session owns the network, both books, the transposition table and the
//! MCTS searcher. `select_move` never changes the position; the caller applies
//! the chosen move with `make_move`.

use crate::agent::ai::{
    check_evaluation_shape, iterative_deepening_search, pick_next_move, search_subtree, terminal_score,
    MaterialEvaluator, MctsSearcher, OpeningBook, RecordBook, SearchLimits, SearchStrategy, SelectedEvaluator,
    TranspositionTable,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::game_repr::{ChessMove, GameState, Position};
use crate::neural::Network;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

pub struct Engine {
    config: EngineConfig,
    position: Position,
    network: Network,
    opening_book: OpeningBook,
    record_book: RecordBook,
    table: TranspositionTable,
    mcts: MctsSearcher,
    rng: StdRng,
    current_evaluation: f64,
}

impl Engine {
    /// Build a session from `config`. The network gets fresh random weights
    /// from the configured seed and must take the 16 position features.
    pub fn new(config: EngineConfig) -> Result<Engine> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = Network::new(&config.network.layers, &mut rng)?;
        check_evaluation_shape(&network)?;

        let table = if config.search.use_transposition_table {
            TranspositionTable::with_capacity(config.search.tt_capacity)
        } else {
            TranspositionTable::disabled()
        };
        let mcts = MctsSearcher::with_params(config.seed, config.mcts.exploration, config.mcts.rollout_plies);
        let opening_book = match (&config.book.path, config.book.enabled) {
            (Some(path), true) => OpeningBook::load(path, config.book.max_plies)?,
            _ => OpeningBook::new(),
        };

        Ok(Engine {
            config,
            position: Position::default(),
            network,
            opening_book,
            record_book: RecordBook::new(),
            table,
            mcts,
            rng,
            current_evaluation: 0.0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Start position, or `fen`, followed by UCI `moves`. The session is left
    /// untouched when any of them is invalid.
    pub fn set_position<S: AsRef<str>>(&mut self, fen: Option<&str>, moves: &[S]) -> Result<()> {
        self.position = Position::from_moves(fen, moves)?;
        Ok(())
    }

    pub fn reset_to(&mut self, position: Position) {
        self.position = position;
    }

    /// Back to the start position with an empty transposition table. The
    /// record book is kept, it accumulates across games.
    pub fn new_game(&mut self) {
        self.position = Position::default();
        self.table.clear();
        self.current_evaluation = 0.0;
    }

    pub fn make_move(&mut self, uci: &str) -> Result<()> {
        let mv = self.position.parse_move(uci)?;
        self.position.apply_move(mv);
        Ok(())
    }

    /// Apply a move already known to be legal in the current position.
    pub fn play(&mut self, mv: ChessMove) {
        self.position.apply_move(mv);
    }

    /// Pick a move for the side to move in UCI notation, or an empty string
    /// when the game is over.
    pub fn select_move(&mut self, limits: &SearchLimits) -> Result<String> {
        if self.position.outcome().is_some() {
            self.current_evaluation = terminal_score(&self.position).unwrap_or(0.0);
            return Ok(String::new());
        }

        if self.config.book.enabled {
            if let Some(mv) = self.opening_book.probe(&self.position, &mut self.rng) {
                info!("book move {}", mv);
                return Ok(mv.to_string());
            }
        }

        let chosen = match self.config.search.strategy {
            SearchStrategy::AlphaBeta => self.alpha_beta_move(limits),
            SearchStrategy::Mcts => self.mcts_move(),
            SearchStrategy::RecordTree => self.record_move(),
        };
        Ok(chosen.map(|mv| mv.to_string()).unwrap_or_default())
    }

    fn alpha_beta_move(&mut self, limits: &SearchLimits) -> Option<ChessMove> {
        let evaluator_config = &self.config.evaluator;
        let mut evaluator = SelectedEvaluator::new(
            evaluator_config.kind,
            &mut self.network,
            evaluator_config.static_weight,
            evaluator_config.network_weight,
        );
        let result = iterative_deepening_search(&mut self.position, &mut evaluator, &mut self.table, limits);
        self.current_evaluation = result.score;
        result.best_move
    }

    fn mcts_move(&mut self) -> Option<ChessMove> {
        let result = self
            .mcts
            .search(&self.position, self.config.mcts.playouts, &mut MaterialEvaluator);
        let chosen = result.playouts.iter().find(|(mv, _)| Some(*mv) == result.best_move);
        if let Some((_, playout)) = chosen {
            self.current_evaluation = playout.win_rate;
        }
        result.best_move
    }

    /// Grow the record book from the current position, then play the move
    /// with the best average.
    pub fn record_move(&mut self) -> Option<ChessMove> {
        let record_config = &self.config.record;
        let evaluator_config = &self.config.evaluator;
        let mut evaluator = SelectedEvaluator::new(
            evaluator_config.kind,
            &mut self.network,
            evaluator_config.static_weight,
            evaluator_config.network_weight,
        );

        let mut max_depth = 0;
        let mut total_depth = 0;
        for _ in 0..record_config.walks_per_move {
            let depth = search_subtree(
                &mut self.position,
                &mut self.record_book,
                &mut evaluator,
                record_config.ply_cap,
            );
            max_depth = max_depth.max(depth);
            total_depth += depth;
        }
        debug!(
            "{} walks, max depth {}, average depth {:.2}",
            record_config.walks_per_move,
            max_depth,
            total_depth as f64 / record_config.walks_per_move.max(1) as f64
        );

        let mv = pick_next_move(&mut self.position, &self.record_book, true)?;
        self.position.apply_move(mv);
        self.current_evaluation = self.record_book.record_of(&self.position).average_eval;
        self.position.undo_move(mv);
        Some(mv)
    }

    /// Evaluation of the last move chosen, White positive
    pub fn current_evaluation(&self) -> f64 {
        self.current_evaluation
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Replace the network with one read from `path`. The current network
    /// stays when the file is malformed or has the wrong shape.
    pub fn load_network<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let network = Network::load(path.as_ref())?;
        check_evaluation_shape(&network)?;
        self.network = network;
        info!("loaded network {}", path.as_ref().display());
        Ok(())
    }

    pub fn save_network<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.network.save(path.as_ref())?;
        info!("wrote network {}", path.as_ref().display());
        Ok(())
    }

    pub fn opening_book(&self) -> &OpeningBook {
        &self.opening_book
    }

    pub fn load_opening_book<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.opening_book = OpeningBook::load(path, self.config.book.max_plies)?;
        Ok(())
    }

    pub fn record_book(&self) -> &RecordBook {
        &self.record_book
    }

    pub fn load_record_book<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.record_book = RecordBook::load(path.as_ref())?;
        info!(
            "loaded record book {} with {} positions",
            path.as_ref().display(),
            self.record_book.len()
        );
        Ok(())
    }

    pub fn save_record_book<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.record_book.save(path.as_ref())?;
        info!(
            "wrote record book {} with {} positions",
            path.as_ref().display(),
            self.record_book.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ai::{EvaluatorKind, MATE_SCORE};
    use crate::error::EngineError;
    use crate::neural::{Activation, LayerSpec};

    fn config(strategy: SearchStrategy) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.search.strategy = strategy;
        config.book.enabled = false;
        config.mcts.playouts = 60;
        config.mcts.rollout_plies = 20;
        config.record.walks_per_move = 30;
        config
    }

    #[test]
    fn test_each_strategy_returns_a_legal_move() {
        for &strategy in SearchStrategy::all() {
            let mut engine = Engine::new(config(strategy)).unwrap();
            let uci = engine.select_move(&SearchLimits::depth(2)).unwrap();
            assert!(engine.position().parse_move(&uci).is_ok(), "{:?} chose {:?}", strategy, uci);
            assert_eq!(engine.position().ply(), 0);
        }
    }

    #[test]
    fn test_alpha_beta_mate_sets_evaluation() {
        let mut engine = Engine::new(config(SearchStrategy::AlphaBeta)).unwrap();
        engine
            .set_position::<&str>(Some("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"), &[])
            .unwrap();
        let uci = engine.select_move(&SearchLimits::depth(3)).unwrap();
        assert_eq!(uci, "a1a8");
        assert_eq!(engine.current_evaluation(), MATE_SCORE);
    }

    #[test]
    fn test_finished_game_returns_empty_move() {
        let mut engine = Engine::new(config(SearchStrategy::AlphaBeta)).unwrap();
        engine
            .set_position(None, &["f2f3", "e7e5", "g2g4", "d8h4"])
            .unwrap();
        assert_eq!(engine.select_move(&SearchLimits::depth(2)).unwrap(), "");
        assert_eq!(engine.current_evaluation(), -MATE_SCORE);
    }

    #[test]
    fn test_illegal_moves_leave_position_untouched() {
        let mut engine = Engine::new(config(SearchStrategy::AlphaBeta)).unwrap();
        engine.make_move("e2e4").unwrap();
        assert!(matches!(engine.make_move("e2e4"), Err(EngineError::IllegalMove(_))));
        assert!(engine.set_position(None, &["e2e4", "e2e4"]).is_err());
        assert_eq!(engine.position().ply(), 1);
    }

    #[test]
    fn test_opening_book_is_consulted_first() {
        let mut cfg = config(SearchStrategy::AlphaBeta);
        cfg.book.enabled = true;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.txt");
        std::fs::write(&path, "a2a3 a7a6\n").unwrap();

        let mut engine = Engine::new(cfg).unwrap();
        engine.load_opening_book(&path).unwrap();
        assert_eq!(engine.select_move(&SearchLimits::depth(2)).unwrap(), "a2a3");
    }

    #[test]
    fn test_record_strategy_fills_book() {
        let mut engine = Engine::new(config(SearchStrategy::RecordTree)).unwrap();
        engine.select_move(&SearchLimits::default()).unwrap();
        let root = engine.record_book().record_of(engine.position());
        assert_eq!(root.seen, 30);
    }

    #[test]
    fn test_network_round_trip_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.txt");
        let mut cfg = config(SearchStrategy::AlphaBeta);
        cfg.evaluator.kind = EvaluatorKind::Network;

        let engine = Engine::new(cfg.clone()).unwrap();
        engine.save_network(&path).unwrap();

        cfg.seed = 99;
        let mut other = Engine::new(cfg).unwrap();
        other.load_network(&path).unwrap();
        assert_eq!(other.network().topology(), engine.network().topology());

        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "2\n3 0.1 0.5 9\n").unwrap();
        let before = other.network().clone();
        assert!(other.load_network(&bad).is_err());
        assert_eq!(other.network().topology(), before.topology());
    }

    #[test]
    fn test_network_with_wrong_shape_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.network.layers = vec![
            LayerSpec::new(2, 0.15, 0.5, Activation::Tanh),
            LayerSpec::new(1, 0.15, 0.5, Activation::Tanh),
        ];
        assert!(matches!(Engine::new(cfg), Err(EngineError::Network(_))));
    }

    #[test]
    fn test_record_book_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        let mut engine = Engine::new(config(SearchStrategy::RecordTree)).unwrap();
        engine.select_move(&SearchLimits::default()).unwrap();
        engine.save_record_book(&path).unwrap();

        let mut other = Engine::new(config(SearchStrategy::RecordTree)).unwrap();
        other.load_record_book(&path).unwrap();
        assert_eq!(other.record_book(), engine.record_book());
    }
}
