//! Bijection between chess moves and the 4672 entries of the policy vector.
//!
//! An action id is `plane * 64 + origin`, where the origin square is in
//! little-endian rank-file order and the plane (0..73) names the kind of move:
//! 56 queen-like planes (8 directions x 7 distances), 8 knight planes and
//! 9 underpromotion planes (3 pawn directions x knight/bishop/rook).

mod action;
pub mod constants;
mod direction;

pub use action::*;
pub use constants::{ActionId, NUM_ACTIONS, NUM_PLANES};
pub use direction::*;
