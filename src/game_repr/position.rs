// Chess position backed by the `chess` crate board.
//
// `chess::Board` is an immutable value type with no history, so this wrapper
// keeps a stack of previous boards for undo and adds the rules the board
// itself does not track: the halfmove clock, repetition and material draws.

use super::{GameState, MoveList};
use crate::error::{EngineError, Result};
use chess::{BitBoard, Board, BoardStatus, ChessMove, Color, MoveGen, Piece, EMPTY};
use std::fmt;
use std::str::FromStr;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmoves without capture or pawn move after which the game is drawn
const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Clone, Copy, Debug)]
struct Snapshot {
    board: Board,
    halfmove_clock: u32,
}

/// A chess position with reversible moves.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    history: Vec<Snapshot>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            board: Board::default(),
            halfmove_clock: 0,
            history: Vec::new(),
        }
    }
}

impl Position {
    /// Parse a FEN string. The move counters are optional; a missing halfmove
    /// clock is taken as zero.
    pub fn from_fen(fen: &str) -> Result<Position> {
        let fen = fen.trim();
        let board = Board::from_str(fen).map_err(|_| EngineError::InvalidFen(fen.to_string()))?;

        let halfmove_clock = match fen.split_whitespace().nth(4) {
            Some(token) => token
                .parse::<u32>()
                .map_err(|_| EngineError::InvalidFen(fen.to_string()))?,
            None => 0,
        };

        Ok(Position {
            board,
            halfmove_clock,
            history: Vec::new(),
        })
    }

    /// Start position followed by the given UCI moves.
    pub fn from_moves<S: AsRef<str>>(fen: Option<&str>, moves: &[S]) -> Result<Position> {
        let mut pos = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::default(),
        };
        for uci in moves {
            let mv = pos.parse_move(uci.as_ref())?;
            pos.apply_move(mv);
        }
        Ok(pos)
    }

    /// Resolve a UCI move string (e.g. `e2e4`, `e7e8q`) against the legal moves.
    pub fn parse_move(&self, uci: &str) -> Result<ChessMove> {
        let uci = uci.trim();
        MoveGen::new_legal(&self.board)
            .find(|mv| mv.to_string() == uci)
            .ok_or_else(|| EngineError::IllegalMove(uci.to_string()))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Number of moves applied since this position was created
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn is_in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    /// Number of pieces of the given kind and color
    pub fn piece_count(&self, piece: Piece, color: Color) -> u32 {
        (*self.board.pieces(piece) & *self.board.color_combined(color)).popcnt()
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.board.castle_rights(color).has_kingside()
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.board.castle_rights(color).has_queenside()
    }

    /// Pawns of `color` standing on their seventh rank (one step from promotion)
    pub fn pawns_on_seventh(&self, color: Color) -> u32 {
        let seventh = color.to_seventh_rank();
        let pawns = *self.board.pieces(Piece::Pawn) & *self.board.color_combined(color);
        pawns.filter(|sq| sq.get_rank() == seventh).count() as u32
    }

    pub fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(&self.board).len()
    }

    /// The position occurred before since the last capture or pawn move.
    fn is_repetition(&self) -> bool {
        let hash = self.board.get_hash();
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .any(|snapshot| snapshot.board.get_hash() == hash)
    }

    fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = board.pieces(Piece::Knight).popcnt();
        let bishops = *board.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }

        // Any number of bishops all on one square color cannot mate.
        knights == 0 && (bishops & LIGHT_SQUARES == EMPTY || bishops & !LIGHT_SQUARES == EMPTY)
    }
}

const LIGHT_SQUARES: BitBoard = BitBoard(0x55AA_55AA_55AA_55AA);

impl GameState for Position {
    type Move = ChessMove;

    fn legal_moves(&self) -> MoveList<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn apply_move(&mut self, mv: ChessMove) {
        let resets_clock = self.is_capture(mv) || self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        let next = self.board.make_move_new(mv);

        self.history.push(Snapshot {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
        });
        self.board = next;
        self.halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };
    }

    fn undo_move(&mut self, _mv: ChessMove) {
        if let Some(snapshot) = self.history.pop() {
            self.board = snapshot.board;
            self.halfmove_clock = snapshot.halfmove_clock;
        }
    }

    fn position_hash(&self) -> u64 {
        self.board.get_hash()
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    fn is_rule_draw(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_PLIES || self.is_insufficient_material() || self.is_repetition()
    }

    fn is_capture(&self, mv: ChessMove) -> bool {
        if self.board.piece_on(mv.get_dest()).is_some() {
            return true;
        }
        // en passant: a pawn changing file onto an empty square
        self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != mv.get_dest().get_file()
    }

    fn move_target(&self, mv: ChessMove) -> u8 {
        mv.get_dest().to_int()
    }

    /// Piece placement, side, castling and en passant fields of the FEN.
    fn to_canonical_string(&self) -> String {
        let fen = self.board.to_string();
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fen = self.board.to_string();
        let placement: Vec<&str> = fen.split_whitespace().take(4).collect();
        let fullmove = 1 + self.history.len() / 2;
        write!(f, "{} {} {}", placement.join(" "), self.halfmove_clock, fullmove)
    }
}
