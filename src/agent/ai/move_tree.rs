// Persistent move tree searched by iterative deepening
//
// Each node owns its children in search order. Children are added lazily and
// never removed, so orderings learned at one depth carry into the next.

use crate::game_repr::{Color, GameState};
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct MoveNode<M> {
    /// Move leading to this node, None at the root
    pub mv: Option<M>,
    /// White-positive evaluation from the last search that reached the node
    pub eval: f64,
    pub(crate) children: Vec<MoveNode<M>>,
    expanded: HashSet<M>,
}

impl<M: Copy + Eq + Hash> MoveNode<M> {
    pub fn root() -> Self {
        Self::new(None, 0.0)
    }

    fn new(mv: Option<M>, eval: f64) -> Self {
        Self {
            mv,
            eval,
            children: Vec::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn children(&self) -> &[MoveNode<M>] {
        &self.children
    }

    /// First child in search order
    pub fn best_child(&self) -> Option<&MoveNode<M>> {
        self.children.first()
    }

    /// Moves along the first-child chain
    pub fn principal_variation(&self) -> Vec<M> {
        let mut line = Vec::new();
        let mut node = self;
        while let Some(child) = node.best_child() {
            match child.mv {
                Some(mv) if child.eval.is_finite() => line.push(mv),
                _ => break,
            }
            node = child;
        }
        line
    }

    /// Total number of nodes in the subtree, this one included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(MoveNode::size).sum::<usize>()
    }

    /// Stable sort: best for White first when White moves, best for Black
    /// first otherwise.
    pub(crate) fn sort_children(&mut self, side_to_move: Color) {
        match side_to_move {
            Color::White => self.children.sort_by(|a, b| b.eval.total_cmp(&a.eval)),
            Color::Black => self.children.sort_by(|a, b| a.eval.total_cmp(&b.eval)),
        }
    }
}

/// Add a child for every legal move of `state` that is not a child yet.
///
/// `state` is the position after the node's move. With `captures_only` a new
/// child is added only when it lands on `capture_square`, the destination of
/// the capture that reached this node; with no such capture nothing is added.
pub fn populate_next_moves<S: GameState>(
    node: &mut MoveNode<S::Move>,
    state: &S,
    captures_only: bool,
    capture_square: Option<u8>,
) {
    if captures_only && capture_square.is_none() {
        return;
    }

    let initial = match state.side_to_move() {
        Color::White => f64::NEG_INFINITY,
        Color::Black => f64::INFINITY,
    };

    for mv in state.legal_moves() {
        if node.expanded.contains(&mv) {
            continue;
        }
        if captures_only && Some(state.move_target(mv)) != capture_square {
            continue;
        }
        node.expanded.insert(mv);
        node.children.push(MoveNode::new(Some(mv), initial));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_repr::{ChessMove, Position};

    #[test]
    fn test_root_expands_every_legal_move_once() {
        let pos = Position::default();
        let mut root: MoveNode<ChessMove> = MoveNode::root();
        populate_next_moves(&mut root, &pos, false, None);
        populate_next_moves(&mut root, &pos, false, None);

        assert_eq!(root.children().len(), 20);
        assert!(root.children().iter().all(|c| c.eval == f64::NEG_INFINITY));
        assert_eq!(root.size(), 21);
    }

    #[test]
    fn test_captures_only_follows_capture_square() {
        // 1. e4 d5 2. exd5: Black can recapture on d5 with the queen
        let mut pos = Position::from_moves(None, &["e2e4", "d7d5"]).unwrap();
        let capture = pos.parse_move("e4d5").unwrap();
        assert!(pos.is_capture(capture));
        let square = pos.move_target(capture);
        pos.apply_move(capture);

        let mut node = MoveNode::root();
        populate_next_moves(&mut node, &pos, true, Some(square));
        let moves: Vec<String> = node.children().iter().filter_map(|c| c.mv).map(|m| m.to_string()).collect();
        assert_eq!(moves, vec!["d8d5"]);
        assert_eq!(node.children()[0].eval, f64::INFINITY);

        let mut quiet = MoveNode::root();
        populate_next_moves(&mut quiet, &pos, true, None);
        assert!(quiet.children().is_empty());
    }

    #[test]
    fn test_sort_children_by_side() {
        let pos = Position::default();
        let mut root: MoveNode<ChessMove> = MoveNode::root();
        populate_next_moves(&mut root, &pos, false, None);
        for (i, child) in root.children.iter_mut().enumerate() {
            child.eval = (i % 5) as f64;
        }

        root.sort_children(Color::White);
        assert_eq!(root.children()[0].eval, 4.0);
        root.sort_children(Color::Black);
        assert_eq!(root.children()[0].eval, 0.0);
    }
}
