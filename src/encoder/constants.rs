// Constants for the input tensor
pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

pub const NUM_PIECE_TYPE_BITS: usize = 6; // 6 piece types
pub const NUM_COLOR_BITS: usize = 2; // mover, opponent
pub const NUM_BITS_PER_BOARD: usize = NUM_PIECE_TYPE_BITS * NUM_COLOR_BITS; // 12 piece planes

pub const NUM_REPETITION_BITS: usize = 2; // seen once before, seen twice before
pub const NUM_BITS_PER_TIME_STEP: usize = NUM_BITS_PER_BOARD + NUM_REPETITION_BITS; // 14

pub const NUM_CONSTANT_BITS: usize = 7; // colour, move counters, castling rights

// Order of the time-independent planes, counted from the first plane after the history.
pub const COLOR_PLANE: usize = 0;
pub const FULLMOVE_PLANE: usize = 1;
pub const HALFMOVE_PLANE: usize = 2;
pub const WHITE_QUEENSIDE_PLANE: usize = 3;
pub const WHITE_KINGSIDE_PLANE: usize = 4;
pub const BLACK_QUEENSIDE_PLANE: usize = 5;
pub const BLACK_KINGSIDE_PLANE: usize = 6;

pub const DEFAULT_HISTORY: usize = 1;

/// Number of planes for `history` time steps: 14 per step plus 7 constant planes.
pub const fn num_planes(history: usize) -> usize {
    NUM_BITS_PER_TIME_STEP * history + NUM_CONSTANT_BITS
}
