//! Residual convolutional policy/value network on libtorch.

mod conv_net;
mod evaluator;
mod policy_head;
mod residual_block;
mod train;
pub mod utils;
mod value_head;

pub use conv_net::*;
pub use evaluator::*;
