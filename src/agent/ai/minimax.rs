// Alpha-beta minimax over the persistent move tree
//
// White maximizes, Black minimizes. Scores are fail-soft: a node may return a
// value outside the window it was searched with, and the transposition table
// records which side of the window that value fell on.

use super::evaluation::{score_leaf, Evaluator};
use super::move_tree::{populate_next_moves, MoveNode};
use super::transposition_table::{NodeType, TranspositionTable, TranspositionTableEntry};
use crate::game_repr::{Color, GameState};

// Mixed into the key of a frontier node reached by a capture. Such a node
// expands only recaptures on that square, so its value depends on the square
// and not just on the position.
const CAPTURE_SQUARE_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) struct SearchContext<'a, E: ?Sized> {
    pub evaluator: &'a mut E,
    pub table: &'a mut TranspositionTable,
    pub nodes: u64,
}

fn table_key(hash: u64, depth: u32, capture_square: Option<u8>) -> u64 {
    match (depth, capture_square) {
        (0, Some(square)) => hash ^ (u64::from(square) + 1).wrapping_mul(CAPTURE_SQUARE_SALT),
        _ => hash,
    }
}

/// Search `node` to `depth` remaining plies within (alpha, beta), leaving its
/// evaluation in `node.eval`. `state` is the position before the node's move
/// and is restored before returning.
///
/// Returns true when the value rests on a rule draw somewhere in the subtree.
/// Repetition and the fifty-move clock depend on the path, not the position,
/// so such values never enter the transposition table.
pub(crate) fn minimax<S, E>(
    node: &mut MoveNode<S::Move>,
    state: &mut S,
    ctx: &mut SearchContext<'_, E>,
    alpha: f64,
    beta: f64,
    depth: u32,
) -> bool
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
{
    match node.mv {
        Some(mv) => {
            let capture_square = state.is_capture(mv).then(|| state.move_target(mv));
            state.apply_move(mv);
            let path_dependent = search_node(node, state, ctx, alpha, beta, depth, capture_square);
            state.undo_move(mv);
            path_dependent
        }
        None => search_node(node, state, ctx, alpha, beta, depth, None),
    }
}

fn search_node<S, E>(
    node: &mut MoveNode<S::Move>,
    state: &mut S,
    ctx: &mut SearchContext<'_, E>,
    alpha: f64,
    beta: f64,
    depth: u32,
    capture_square: Option<u8>,
) -> bool
where
    S: GameState,
    E: Evaluator<S> + ?Sized,
{
    ctx.nodes += 1;
    let is_root = node.mv.is_none();
    let key = table_key(state.position_hash(), depth, capture_square);

    if !is_root {
        if state.is_rule_draw() {
            node.eval = 0.0;
            return true;
        }
        if let Some(score) = ctx.table.probe(key, depth, alpha, beta) {
            node.eval = score;
            return false;
        }
    }

    populate_next_moves(node, state, depth == 0, capture_square);

    if node.children.is_empty() {
        node.eval = score_leaf(state, &mut *ctx.evaluator);
        if !is_root {
            store(ctx.table, key, depth, node.eval, NodeType::Exact);
        }
        return false;
    }

    let side = state.side_to_move();
    let (mut a, mut b) = (alpha, beta);
    node.eval = match side {
        Color::White => f64::NEG_INFINITY,
        Color::Black => f64::INFINITY,
    };

    let child_depth = depth.saturating_sub(1);
    let mut path_dependent = false;
    for child in node.children.iter_mut() {
        path_dependent |= minimax(child, state, ctx, a, b, child_depth);
        match side {
            Color::White => {
                node.eval = node.eval.max(child.eval);
                a = a.max(child.eval);
            }
            Color::Black => {
                node.eval = node.eval.min(child.eval);
                b = b.min(child.eval);
            }
        }
        if b < a {
            break;
        }
    }

    if !is_root && !path_dependent {
        store(ctx.table, key, depth, node.eval, NodeType::classify(node.eval, alpha, beta));
    }
    node.sort_children(side);
    path_dependent
}

fn store(table: &mut TranspositionTable, hash: u64, depth: u32, score: f64, node_type: NodeType) {
    table.store(TranspositionTableEntry {
        hash,
        depth,
        score,
        node_type,
    });
}
