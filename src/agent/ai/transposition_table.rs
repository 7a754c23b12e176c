// Transposition table for the alpha-beta search
//
// Keys are the 64-bit position hashes supplied by the game state. A stored
// score answers a probe at the same or a shallower remaining depth, and bound
// entries only answer when they already decide the probing window.

use std::collections::HashMap;

/// Node type for transposition table entries
///
/// - Exact: the score was searched with a window that contained it
/// - LowerBound: the search failed high, the true score is at least this
/// - UpperBound: the search failed low, the true score is at most this
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    LowerBound,
    UpperBound,
}

impl NodeType {
    /// Classify a fail-soft result `score` searched with window (alpha, beta).
    pub fn classify(score: f64, alpha: f64, beta: f64) -> Self {
        if score <= alpha {
            NodeType::UpperBound
        } else if score >= beta {
            NodeType::LowerBound
        } else {
            NodeType::Exact
        }
    }
}

/// Entry in the transposition table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranspositionTableEntry {
    pub hash: u64,
    /// Remaining depth when the position was searched
    pub depth: u32,
    /// White-positive score
    pub score: f64,
    pub node_type: NodeType,
}

pub struct TranspositionTable {
    table: HashMap<u64, TranspositionTableEntry>,
    max_size: usize,
    enabled: bool,
    /// Statistics: number of probes answered from the table
    pub hits: u64,
    /// Statistics: number of probes that fell through to a search
    pub misses: u64,
}

impl TranspositionTable {
    /// Create a transposition table with default size (1 million entries)
    pub fn new() -> Self {
        Self::with_capacity(1_000_000)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            table: HashMap::with_capacity(max_size.min(100_000)),
            max_size,
            enabled: true,
            hits: 0,
            misses: 0,
        }
    }

    /// A table that never stores and never answers. Searching with it gives
    /// the same results as searching with an enabled table, only slower.
    pub fn disabled() -> Self {
        let mut table = Self::with_capacity(0);
        table.enabled = false;
        table
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a score usable for a node at `depth` searched with window
    /// (alpha, beta). Entries searched shallower than `depth` are ignored.
    /// Updates hit/miss statistics.
    pub fn probe(&mut self, hash: u64, depth: u32, alpha: f64, beta: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }

        let usable = self.table.get(&hash).and_then(|entry| {
            if entry.hash != hash || entry.depth < depth {
                return None;
            }
            match entry.node_type {
                NodeType::Exact => Some(entry.score),
                NodeType::LowerBound if entry.score >= beta => Some(entry.score),
                NodeType::UpperBound if entry.score <= alpha => Some(entry.score),
                _ => None,
            }
        });

        match usable {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        usable
    }

    /// Store an entry. An existing entry for the same hash is replaced unless
    /// it is exact and the new one is only a bound at the same depth. When
    /// the table is full, new hashes are dropped.
    pub fn store(&mut self, entry: TranspositionTableEntry) {
        if !self.enabled {
            return;
        }

        match self.table.get(&entry.hash) {
            Some(existing) => {
                let keep_existing = existing.depth == entry.depth
                    && existing.node_type == NodeType::Exact
                    && entry.node_type != NodeType::Exact;
                if keep_existing {
                    return;
                }
            }
            None if self.table.len() >= self.max_size => return,
            None => {}
        }

        self.table.insert(entry.hash, entry);
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&mut self) {
        self.table.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Get hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}
