//! Self-play reinforcement learning for chess in the AlphaZero style.
//!
//! [`codec`] maps moves onto the 4672 action ids, [`encoder`] turns positions into network
//! input, and [`engine`] holds the PUCT search, self-play and the training loop built on them.

pub mod codec;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod game;
pub mod rules;

pub use error::{Error, Result};
