pub mod arena;
#[cfg(feature = "torch")]
pub mod conv_net_evaluator;
pub mod evaluation;
pub mod mcts;
pub mod self_play;
pub mod trainer;
pub mod uniform_evaluator;
