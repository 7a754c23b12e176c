//! Difficulty levels and the search limits they map to.
//!
//! - **Easy**: Depth 2
//! - **Medium**: Depth 4
//! - **Hard**: Depth 6
//! - **Expert**: Depth 8 with a 5s time budget

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// AI difficulty levels that map to search depth and time controls
///
/// Higher levels produce stronger play but take longer per move. The depth is
/// counted in plies (half-moves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }

    /// Maximum search depth in plies
    pub fn max_depth(&self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Expert => 8,
        }
    }

    /// Time budget in milliseconds, None for unlimited
    pub fn time_limit_ms(&self) -> Option<u64> {
        match self {
            Difficulty::Expert => Some(5000),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.max_depth(),
            time_budget: self.time_limit_ms().map(Duration::from_millis),
        }
    }
}

/// Bounds on one iterative deepening search.
///
/// The time budget is checked between iterations only, so a search always
/// completes depth 1 and may overrun the budget by one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u32,
    pub time_budget: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            time_budget: None,
        }
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Difficulty::default().limits()
    }
}
