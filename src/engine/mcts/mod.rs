mod mcts;
mod mcts_node;

pub use mcts::*;
pub use mcts_node::*;
