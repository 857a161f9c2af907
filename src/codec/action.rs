use chess::{ChessMove, Piece, Square, ALL_SQUARES};
use thiserror::Error;

use crate::codec::constants::*;
use crate::codec::direction::{offset_square, KnightDirection, RayDirection};
use crate::rules::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("No ray or knight direction leads from {from} to {to}")]
    UnrecognizedDirection { from: Square, to: Square },

    #[error("Cannot promote to {piece:?} when moving from {from} to {to}")]
    InvalidPromotion { from: Square, to: Square, piece: Piece },

    #[error("Plane {0} is outside the action space")]
    PlaneOutOfRange(usize),

    #[error("Action {0} leads off the board")]
    OffBoard(ActionId),
}

const UNDERPROMOTION_PIECES: [Piece; NUM_UNDERPROMOTIONS] = [Piece::Knight, Piece::Bishop, Piece::Rook];
const FORWARD_PAWN_DIRECTIONS: [RayDirection; NUM_PAWN_MOVE_DIRECTIONS] =
    [RayDirection::NorthWest, RayDirection::North, RayDirection::NorthEast];
const RANK_7: usize = 6;

/// Maps a queen-like move to one of the 73 planes.
/// Planes 0-55 for queen-like moves (queen promotions included), 64-72 for underpromotions.
fn calc_plane_for_queen_like_move(
    src_square: Square,
    dst_square: Square,
    direction: RayDirection,
    distance: u8,
    promotion: Option<Piece>,
) -> Result<usize, CodecError> {
    let underpromotion_index = match promotion {
        None | Some(Piece::Queen) => {
            return Ok(direction as usize * MAX_RAY_LENGTH + (distance as usize - 1));
        }
        Some(piece) => UNDERPROMOTION_PIECES.iter().position(|&p| p == piece),
    };

    let invalid = || CodecError::InvalidPromotion { from: src_square, to: dst_square, piece: promotion.unwrap_or(Piece::King) };
    let underpromotion_index = underpromotion_index.ok_or_else(invalid)?;
    let group = direction.underpromotion_group().filter(|_| distance == 1).ok_or_else(invalid)?;

    Ok(UNDERPROMOTION_OFFSET + group * NUM_UNDERPROMOTIONS + underpromotion_index)
}

/// Maps a move given by its coordinates to its action id.
///
/// The id depends only on the origin square, the destination square and the
/// promotion piece: no board, side to move or history is consulted.
pub fn encode_parts(src_square: Square, dst_square: Square, promotion: Option<Piece>) -> Result<ActionId, CodecError> {
    let plane = if let Some(direction) = KnightDirection::calc(src_square, dst_square) {
        if let Some(piece) = promotion {
            return Err(CodecError::InvalidPromotion { from: src_square, to: dst_square, piece });
        }
        KNIGHT_MOVE_OFFSET + direction as usize
    } else if let Some((direction, distance)) = RayDirection::calc_and_measure_distance(src_square, dst_square) {
        calc_plane_for_queen_like_move(src_square, dst_square, direction, distance, promotion)?
    } else {
        return Err(CodecError::UnrecognizedDirection { from: src_square, to: dst_square });
    };

    Ok(plane * NUM_SQUARES + src_square.to_index())
}

pub fn encode(mv: ChessMove) -> Result<ActionId, CodecError> {
    encode_parts(mv.get_source(), mv.get_dest(), mv.get_promotion())
}

/// Maps an action id back to a move.
///
/// The board is only read to learn whether a pawn stands on the origin square, which
/// turns a queen-like move onto the first or last rank into a queen promotion.
pub fn decode<P: Position>(action: ActionId, position: &P) -> Result<ChessMove, CodecError> {
    let plane = action / NUM_SQUARES;
    let src_square = ALL_SQUARES[action % NUM_SQUARES];
    let off_board = || CodecError::OffBoard(action);

    if plane < KNIGHT_MOVE_OFFSET {
        let direction = RayDirection::from_index(plane / MAX_RAY_LENGTH).ok_or(CodecError::PlaneOutOfRange(plane))?;
        let distance = (plane % MAX_RAY_LENGTH + 1) as i8;
        let dst_square = offset_square(src_square, direction.step(), distance).ok_or_else(off_board)?;

        let dst_rank = dst_square.to_index() / 8;
        let is_pawn = matches!(position.piece_on(src_square), Some((Piece::Pawn, _)));
        let promotion = if is_pawn && (dst_rank == 0 || dst_rank == 7) {
            Some(Piece::Queen)
        } else {
            None
        };
        Ok(ChessMove::new(src_square, dst_square, promotion))
    } else if plane < UNDERPROMOTION_OFFSET {
        let direction = KnightDirection::from_index(plane - KNIGHT_MOVE_OFFSET).ok_or(CodecError::PlaneOutOfRange(plane))?;
        let dst_square = offset_square(src_square, direction.jump(), 1).ok_or_else(off_board)?;
        Ok(ChessMove::new(src_square, dst_square, None))
    } else if plane < NUM_PLANES {
        let index = plane - UNDERPROMOTION_OFFSET;
        let forward = FORWARD_PAWN_DIRECTIONS[index / NUM_UNDERPROMOTIONS];
        // A pawn on the seventh rank promotes northwards, anything else is read as a black pawn.
        let direction = if src_square.to_index() / 8 == RANK_7 { forward } else { forward.flip() };
        let dst_square = offset_square(src_square, direction.step(), 1).ok_or_else(off_board)?;
        let promotion = UNDERPROMOTION_PIECES[index % NUM_UNDERPROMOTIONS];
        Ok(ChessMove::new(src_square, dst_square, Some(promotion)))
    } else {
        Err(CodecError::PlaneOutOfRange(plane))
    }
}

/// Legal moves of `position` paired with their action ids, in move generation order.
pub fn legal_actions<P: Position>(position: &P) -> Result<Vec<(ActionId, ChessMove)>, CodecError> {
    position
        .legal_moves()
        .into_iter()
        .map(|mv| encode(mv).map(|action| (action, mv)))
        .collect()
}

/// A mask over the whole action space, `true` exactly at the legal actions of `position`.
pub fn legal_mask<P: Position>(position: &P) -> Result<Vec<bool>, CodecError> {
    let mut mask = vec![false; NUM_ACTIONS];
    for (action, _) in legal_actions(position)? {
        mask[action] = true;
    }
    Ok(mask)
}
