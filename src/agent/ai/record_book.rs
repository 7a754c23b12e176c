// Record book: averaged evaluations of every position the tree walks reached
//
// A walk follows book moves from the current position until it steps off the
// book or the game ends, scores that leaf once and folds the score into the
// running mean of every position on the way. Persisted one position per line
// as `<average> <seen> <canonical position>`.

use super::evaluation::Evaluator;
use crate::error::{EngineError, Result};
use crate::game_repr::{Color, GameOutcome, GameState};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Weight of the exploration term in `pick_next_move`
const EXPLORATION_WEIGHT: f64 = 0.25;
/// Exploration term of a child that was never visited
const UNSEEN_BONUS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Record {
    pub average_eval: f64,
    pub seen: u32,
}

impl Record {
    /// Fold `value` into the running mean.
    pub fn update(&mut self, value: f64) {
        let seen = self.seen as f64;
        self.average_eval = (self.average_eval * seen + value) / (seen + 1.0);
        self.seen += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBook {
    entries: BTreeMap<String, Record>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Record)> {
        self.entries.iter()
    }

    /// Record for the position of `state`, zeroed when never seen
    pub fn record_of<S: GameState>(&self, state: &S) -> Record {
        self.get(&state.to_canonical_string()).copied().unwrap_or_default()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (key, record) in &self.entries {
            writeln!(out, "{} {} {}", record.average_eval, record.seen, key)?;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(fs::File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()?;
        Ok(())
    }

    pub fn parse(text: &str) -> Result<RecordBook> {
        let mut entries = BTreeMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = i + 1;
            let mut fields = line.splitn(3, ' ');
            let average_eval = parse_field(fields.next(), line_no, "average evaluation")?;
            let seen = parse_field(fields.next(), line_no, "visit count")?;
            let key = fields
                .next()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| book_error(line_no, "missing position"))?;
            entries.insert(key.to_string(), Record { average_eval, seen });
        }
        Ok(RecordBook { entries })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<RecordBook> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> Result<T> {
    let token = field.unwrap_or("");
    token
        .parse()
        .map_err(|_| book_error(line, &format!("invalid {}: {:?}", what, token)))
}

fn book_error(line: usize, message: &str) -> EngineError {
    EngineError::Book {
        line,
        message: message.to_string(),
    }
}

/// Game result if the game is over. Rule draws and `draw_condition` are
/// checked before checkmate.
pub fn check_termination<S: GameState>(state: &S, draw_condition: bool) -> Option<GameOutcome> {
    if draw_condition || state.is_rule_draw() {
        return Some(GameOutcome::Draw);
    }
    state.outcome()
}

/// Walk the book from `state` and back up one leaf evaluation. Positions
/// `ply_cap` plies deep count as drawn. Returns the walk depth; `state` is
/// restored before returning.
pub fn search_subtree<S, E>(state: &mut S, book: &mut RecordBook, evaluator: &mut E, ply_cap: usize) -> usize
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
{
    let mut path = Vec::new();
    let terminal = loop {
        let terminal = check_termination(state, path.len() >= ply_cap);
        if terminal.is_some() || !book.contains(&state.to_canonical_string()) {
            break terminal;
        }
        match pick_next_move(state, book, false) {
            Some(mv) => {
                state.apply_move(mv);
                path.push(mv);
            }
            None => break Some(GameOutcome::Draw),
        }
    };

    let value = match terminal {
        Some(outcome) => f64::from(outcome.score()),
        None => evaluator.evaluate(state),
    };

    book.entries.entry(state.to_canonical_string()).or_default().update(value);
    for &mv in path.iter().rev() {
        state.undo_move(mv);
        book.entries.entry(state.to_canonical_string()).or_default().update(value);
    }

    path.len()
}

/// Choose a move from the book statistics of the children of `state`.
///
/// A mating move is returned immediately. Otherwise every child is scored by
/// its average, plus an exploration term unless `ignore_exploration`. White
/// takes the highest score, Black the lowest.
pub fn pick_next_move<S: GameState>(state: &mut S, book: &RecordBook, ignore_exploration: bool) -> Option<S::Move> {
    let moves = state.legal_moves();
    if moves.is_empty() {
        return None;
    }

    let side = state.side_to_move();
    let mut children = Vec::with_capacity(moves.len());
    let mut total_seen = 0u64;
    for &mv in moves.iter() {
        state.apply_move(mv);
        let mates = state.is_checkmate();
        let record = book.record_of(state);
        state.undo_move(mv);

        if mates {
            return Some(mv);
        }
        total_seen += u64::from(record.seen);
        children.push((mv, record));
    }

    let sign = match side {
        Color::White => 1.0,
        Color::Black => -1.0,
    };
    let mut scored: Vec<(S::Move, f64)> = children
        .iter()
        .map(|&(mv, record)| {
            let score = if ignore_exploration {
                record.average_eval
            } else {
                let exploration = if record.seen == 0 {
                    UNSEEN_BONUS
                } else {
                    (2.0 * (total_seen as f64).ln() / record.seen as f64).sqrt()
                };
                EXPLORATION_WEIGHT * sign * exploration + record.average_eval
            };
            (mv, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let chosen = match side {
        Color::White => scored.first(),
        Color::Black => scored.last(),
    };
    if ignore_exploration {
        if let Some((mv, score)) = chosen {
            debug!("record book picks {} with average {:.3}", mv, score);
        }
    }
    chosen.map(|&(mv, _)| mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ai::evaluation::MaterialEvaluator;
    use crate::game_repr::Position;

    #[test]
    fn test_record_update_is_running_mean() {
        let mut record = Record::default();
        for value in [1.0, 0.0, -1.0, 0.5] {
            record.update(value);
        }
        assert_eq!(record.seen, 4);
        assert!((record.average_eval - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_first_walk_scores_the_root() {
        let mut pos = Position::default();
        let mut book = RecordBook::new();
        let depth = search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);

        assert_eq!(depth, 0);
        assert_eq!(book.len(), 1);
        assert_eq!(book.record_of(&pos), Record { average_eval: 0.0, seen: 1 });
    }

    #[test]
    fn test_walks_grow_the_book_and_restore_position() {
        let mut pos = Position::default();
        let key = pos.to_canonical_string();
        let mut book = RecordBook::new();
        let walks = 30;
        for _ in 0..walks {
            search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);
        }

        assert_eq!(pos.to_canonical_string(), key);
        assert_eq!(pos.ply(), 0);
        // every walk passes through the root exactly once
        assert_eq!(book.get(&key).map(|r| r.seen), Some(walks));
        // one new leaf per walk
        assert_eq!(book.len(), walks as usize);
    }

    #[test]
    fn test_unseen_children_are_explored_first() {
        let mut pos = Position::default();
        let mut book = RecordBook::new();
        for _ in 0..21 {
            search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);
        }
        // root plus all 20 replies, each seen once
        let mut children_seen = 0;
        for mv in pos.legal_moves() {
            pos.apply_move(mv);
            children_seen += book.record_of(&pos).seen;
            pos.undo_move(mv);
        }
        assert_eq!(children_seen, 20);
    }

    #[test]
    fn test_mate_is_picked_immediately() {
        let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let book = RecordBook::new();
        let mv = pick_next_move(&mut pos, &book, true).unwrap();
        assert_eq!(mv.to_string(), "a1a8");
    }

    #[test]
    fn test_mating_walk_backs_up_win() {
        let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let mut book = RecordBook::new();
        search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);
        let depth = search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);

        assert_eq!(depth, 1);
        let root = book.record_of(&pos);
        assert_eq!(root.seen, 2);
        // first walk scored material (+5), second the mate (+1)
        assert!((root.average_eval - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_exploitation_follows_averages() {
        let mut pos = Position::from_moves(None, &["e2e4"]).unwrap();
        let mut book = RecordBook::new();
        let replies: Vec<_> = pos.legal_moves().into_iter().collect();
        for (i, &mv) in replies.iter().enumerate() {
            pos.apply_move(mv);
            let value = if i == 3 { -2.0 } else { 0.5 };
            book.entries.insert(pos.to_canonical_string(), Record { average_eval: value, seen: 1 });
            pos.undo_move(mv);
        }

        // Black prefers the lowest average
        assert_eq!(pick_next_move(&mut pos, &book, true), Some(replies[3]));
    }

    #[test]
    fn test_ply_cap_counts_as_draw() {
        let mut pos = Position::default();
        let mut book = RecordBook::new();
        book.entries.insert(pos.to_canonical_string(), Record { average_eval: 4.0, seen: 1 });
        let depth = search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 0);

        assert_eq!(depth, 0);
        assert_eq!(book.record_of(&pos), Record { average_eval: 2.0, seen: 2 });
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut pos = Position::default();
        let mut book = RecordBook::new();
        for _ in 0..5 {
            search_subtree(&mut pos, &mut book, &mut MaterialEvaluator, 200);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        book.save(&path).unwrap();
        let loaded = RecordBook::load(&path).unwrap();
        assert_eq!(loaded, book);

        let text = std::fs::read_to_string(&path).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first.split(' ').count(), 2 + 4);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = "0.5 3 8/8/8/8/8/8/8/8 w - -\n\nabc 1 8/8/8/8/8/8/8/8 b - -\n";
        match RecordBook::parse(text) {
            Err(EngineError::Book { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected book error, got {:?}", other),
        }
        assert!(RecordBook::parse("0.5 3\n").is_err());
    }
}
