pub mod constants;
mod game_state;

pub use constants::{num_planes, DEFAULT_HISTORY};
pub use game_state::*;
