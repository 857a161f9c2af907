use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chess::{BitBoard, Board, BoardStatus, CastleRights, ChessMove, Color, MoveGen, Piece, Square};

use crate::rules::{Position, RulesError, Termination};

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;
const SEVENTY_FIVE_MOVE_LIMIT: u32 = 150;
const FIVEFOLD: usize = 5;

/// A [`chess::Board`] plus the game record the board itself does not keep:
/// move counters and the hashes needed to count repetitions.
#[derive(Clone, Debug)]
pub struct ChessPosition {
    board: Board,
    /// Hashes of every position reached so far, the current one last.
    history: Vec<u64>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl ChessPosition {
    pub fn initial() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }

    pub fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            board,
            history: vec![board.get_hash()],
            halfmove_clock,
            fullmove_number,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(RulesError::InvalidFen(fen.to_string()));
        }
        let board = Board::from_str(&fields[..4].join(" "))
            .map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        let parse_counter = |index: usize, default: u32| match fields.get(index) {
            Some(field) => field.parse::<u32>().map_err(|_| RulesError::InvalidFen(fen.to_string())),
            None => Ok(default),
        };
        let halfmove_clock = parse_counter(4, 0)?;
        let fullmove_number = parse_counter(5, 1)?;

        Ok(Self::from_board(board, halfmove_clock, fullmove_number))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fen(&self) -> String {
        let board_fen = self.board.to_string();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!("{} {} {}", fields.join(" "), self.halfmove_clock, self.fullmove_number)
    }

    fn is_insufficient_material(&self) -> bool {
        let pieces = |piece: Piece| *self.board.pieces(piece);
        if (pieces(Piece::Pawn) | pieces(Piece::Rook) | pieces(Piece::Queen)).popcnt() > 0 {
            return false;
        }

        let knights = pieces(Piece::Knight);
        let bishops = pieces(Piece::Bishop);
        if (knights | bishops).popcnt() <= 1 {
            return true;
        }

        // Any number of bishops that all live on one square colour cannot mate.
        knights == BitBoard(0) && (bishops.0 & LIGHT_SQUARES == 0 || bishops.0 & !LIGHT_SQUARES == 0)
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::initial()
    }
}

impl Display for ChessPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fen())
    }
}

impl Position for ChessPosition {
    fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    fn push(&mut self, mv: ChessMove) -> Result<(), RulesError> {
        if !self.board.legal(mv) {
            return Err(RulesError::IllegalMove { mv: mv.to_string(), fen: self.fen() });
        }

        let is_pawn_move = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn);
        let is_capture = self.board.piece_on(mv.get_dest()).is_some();
        let mover = self.board.side_to_move();

        self.board = self.board.make_move_new(mv);
        self.history.push(self.board.get_hash());

        self.halfmove_clock = if is_pawn_move || is_capture { 0 } else { self.halfmove_clock + 1 };
        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        Ok(())
    }

    fn termination(&self) -> Option<Termination> {
        match self.board.status() {
            BoardStatus::Checkmate => return Some(Termination::Checkmate),
            _ if self.is_insufficient_material() => return Some(Termination::InsufficientMaterial),
            BoardStatus::Stalemate => return Some(Termination::Stalemate),
            BoardStatus::Ongoing => {}
        }
        if self.halfmove_clock >= SEVENTY_FIVE_MOVE_LIMIT {
            return Some(Termination::SeventyFiveMoveRule);
        }
        if self.is_repetition(FIVEFOLD) {
            return Some(Termination::FivefoldRepetition);
        }
        None
    }

    fn position_hash(&self) -> u64 {
        self.board.get_hash()
    }

    fn repetition_count(&self) -> usize {
        let current = self.board.get_hash();
        // Positions before the last capture or pawn move can never recur.
        self.history
            .iter()
            .rev()
            .take(self.halfmove_clock as usize + 1)
            .filter(|&&hash| hash == current)
            .count()
    }

    fn piece_on(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some((piece, color))
    }

    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn castle_rights(&self, color: Color) -> CastleRights {
        self.board.castle_rights(color)
    }

    fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
}
