// Constants for the action space
pub const NUM_SQUARES: usize = 64;

pub const NUM_RAY_DIRECTIONS: usize = 8; // 8 directions for queen-like moves
pub const MAX_RAY_LENGTH: usize = 7; // Maximum length of a queen-like move
pub const NUM_QUEEN_LIKE_MOVES: usize = NUM_RAY_DIRECTIONS * MAX_RAY_LENGTH; // planes 0-55

pub const NUM_KNIGHT_DIRECTIONS: usize = 8;
pub const KNIGHT_MOVE_OFFSET: usize = NUM_QUEEN_LIKE_MOVES; // planes 56-63

pub const NUM_PAWN_MOVE_DIRECTIONS: usize = 3; // 3 directions a promoting pawn can take
pub const NUM_UNDERPROMOTIONS: usize = 3; // 3 underpromotions (knight, bishop, rook)
pub const NUM_WAYS_OF_UNDERPROMOTION: usize = NUM_PAWN_MOVE_DIRECTIONS * NUM_UNDERPROMOTIONS;
pub const UNDERPROMOTION_OFFSET: usize = KNIGHT_MOVE_OFFSET + NUM_KNIGHT_DIRECTIONS; // planes 64-72

pub const NUM_PLANES: usize = UNDERPROMOTION_OFFSET + NUM_WAYS_OF_UNDERPROMOTION; // 73 move types per square
pub const NUM_ACTIONS: usize = NUM_PLANES * NUM_SQUARES; // 4672 entries in the policy vector

/// Index into the flat policy vector: `plane * 64 + origin square`.
pub type ActionId = usize;
