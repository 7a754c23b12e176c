// Position features fed to the evaluation network
//
// Layout (16 values):
//   0      side to move (+1 White, -1 Black)
//   1      legal move count
//   2..9   White: queens, bishops, rooks, knights, pawns, castle K, castle Q
//   9..16  Black: same order
//
// Counts are scaled by their starting value so every feature stays near [0, 1].

use crate::game_repr::{Color, GameState, Piece, Position};

pub const FEATURE_COUNT: usize = 16;

// Typical number of legal moves in a middlegame position
const MOBILITY_SCALE: f64 = 40.0;

const COUNTED_PIECES: [(Piece, f64); 5] = [
    (Piece::Queen, 1.0),
    (Piece::Bishop, 2.0),
    (Piece::Rook, 2.0),
    (Piece::Knight, 2.0),
    (Piece::Pawn, 8.0),
];

pub fn extract_features(pos: &Position) -> [f64; FEATURE_COUNT] {
    let mut features = [0.0; FEATURE_COUNT];
    features[0] = match pos.side_to_move() {
        Color::White => 1.0,
        Color::Black => -1.0,
    };
    features[1] = pos.legal_move_count() as f64 / MOBILITY_SCALE;

    let mut i = 2;
    for color in [Color::White, Color::Black] {
        for (piece, initial) in COUNTED_PIECES {
            features[i] = pos.piece_count(piece, color) as f64 / initial;
            i += 1;
        }
        features[i] = pos.can_castle_kingside(color) as u8 as f64;
        features[i + 1] = pos.can_castle_queenside(color) as u8 as f64;
        i += 2;
    }

    features
}
