//! The chess rules the search is built on, expressed as the [`Position`] capability.
//!
//! Everything above this module only talks to `Position`, so any engine that can
//! list legal moves, play them, detect the end of the game and hash positions can
//! stand in for [`ChessPosition`].

mod position;
mod termination;

use chess::{CastleRights, ChessMove, Color, Piece, Square};
use thiserror::Error;

pub use position::*;
pub use termination::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}

pub trait Position: Clone {
    /// Legal moves in generation order.
    fn legal_moves(&self) -> Vec<ChessMove>;

    fn push(&mut self, mv: ChessMove) -> Result<(), RulesError>;

    fn termination(&self) -> Option<Termination>;

    fn is_terminal(&self) -> bool {
        self.termination().is_some()
    }

    /// Only defined once the game is over.
    fn outcome(&self) -> Option<Outcome> {
        self.termination().map(|termination| Outcome {
            termination,
            winner: match termination {
                Termination::Checkmate => Some(!self.side_to_move()),
                _ => None,
            },
        })
    }

    /// Zobrist digest of piece placement, side to move, castling rights and en passant.
    /// Move counters are excluded so transpositions share a hash.
    fn position_hash(&self) -> u64;

    /// Number of times the current position has occurred, the current occurrence included.
    fn repetition_count(&self) -> usize;

    fn is_repetition(&self, count: usize) -> bool {
        self.repetition_count() >= count
    }

    fn piece_on(&self, square: Square) -> Option<(Piece, Color)>;

    fn side_to_move(&self) -> Color;

    fn castle_rights(&self, color: Color) -> CastleRights;

    fn fullmove_number(&self) -> u32;

    fn halfmove_clock(&self) -> u32;
}
