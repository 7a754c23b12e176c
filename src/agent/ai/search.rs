// Iterative Deepening Search Orchestrator
//
// Searches depth 1, 2, 3, ... over one persistent move tree. Every pass
// re-sorts the children it visits, so each deeper pass starts from the move
// order the previous one found.

use super::difficulty::SearchLimits;
use super::evaluation::{Evaluator, MATE_SCORE};
use super::minimax::{minimax, SearchContext};
use super::move_tree::MoveNode;
use super::transposition_table::TranspositionTable;
use crate::game_repr::GameState;
use log::info;
use std::fmt::Display;
use std::time::Instant;

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best_move: Option<M>,
    /// White-positive evaluation of the best move
    pub score: f64,
    /// Last completed depth
    pub depth: u32,
    pub nodes_searched: u64,
    pub tt_hits: u64,
    pub time_ms: u64,
    pub principal_variation: Vec<M>,
    /// Root moves with their evaluations, in final search order
    pub root_moves: Vec<(M, f64)>,
}

impl<M> SearchResult<M> {
    /// Create a new search result with no move found
    pub fn new() -> Self {
        Self {
            best_move: None,
            score: 0.0,
            depth: 0,
            nodes_searched: 0,
            tt_hits: 0,
            time_ms: 0,
            principal_variation: Vec::new(),
            root_moves: Vec::new(),
        }
    }
}

impl<M> Default for SearchResult<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Perform iterative deepening search to find the best move
///
/// # Arguments
/// * `state` - Position to search, restored before returning
/// * `evaluator` - Scores frontier positions
/// * `table` - Transposition table, cleared before every depth
/// * `limits` - Maximum depth and optional time budget
///
/// # Returns
/// SearchResult containing the best move and search statistics. A position
/// without legal moves yields no move and a score of 0.
pub fn iterative_deepening_search<S, E>(
    state: &mut S,
    evaluator: &mut E,
    table: &mut TranspositionTable,
    limits: &SearchLimits,
) -> SearchResult<S::Move>
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
{
    let start_time = Instant::now();
    let mut result = SearchResult::new();
    let mut root = MoveNode::root();

    if state.legal_moves().is_empty() {
        return result;
    }

    let max_depth = limits.max_depth.max(1);
    for depth in 1..=max_depth {
        if depth > 1 {
            if let Some(budget) = limits.time_budget {
                if start_time.elapsed() >= budget {
                    break;
                }
            }
        }

        table.clear();
        let mut ctx = SearchContext {
            evaluator: &mut *evaluator,
            table: &mut *table,
            nodes: 0,
        };
        minimax(&mut root, state, &mut ctx, f64::NEG_INFINITY, f64::INFINITY, depth);
        result.nodes_searched += ctx.nodes;
        result.tt_hits += table.hits;

        let Some(best) = root.best_child() else {
            break;
        };
        result.best_move = best.mv;
        result.score = best.eval;
        result.depth = depth;
        result.time_ms = start_time.elapsed().as_millis() as u64;
        result.principal_variation = root.principal_variation();
        print_search_info(&result, &start_time);

        if best.eval.abs() >= MATE_SCORE || root.children().len() == 1 {
            break;
        }
    }

    result.time_ms = start_time.elapsed().as_millis() as u64;
    result.root_moves = root
        .children()
        .iter()
        .filter_map(|child| child.mv.map(|mv| (mv, child.eval)))
        .collect();
    result
}

/// Log search information for a completed depth
fn print_search_info<M: Display>(result: &SearchResult<M>, start_time: &Instant) {
    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    let nps = if elapsed_ms > 0 {
        (result.nodes_searched as f64 / elapsed_ms as f64 * 1000.0) as u64
    } else {
        result.nodes_searched
    };
    let pv: Vec<String> = result.principal_variation.iter().map(|mv| mv.to_string()).collect();

    info!(
        "info depth {} score {:.2} nodes {} time {} nps {} pv {}",
        result.depth,
        result.score,
        result.nodes_searched,
        elapsed_ms,
        nps,
        pv.join(" ")
    );
}
