use thiserror::Error;

use crate::codec::CodecError;
use crate::rules::RulesError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("At least 2 simulations are required per search, got {0}")]
    TooFewSimulations(usize),

    #[error("Position {0:#018x} has never been visited by the search")]
    UnvisitedPosition(u64),

    #[error("Training example still holds a pending reward")]
    UnresolvedReward,

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Move sampling failed: {0}")]
    Sampling(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "torch")]
    #[error("Torch error: {0}")]
    Torch(#[from] tch::TchError),
}

pub type Result<T> = std::result::Result<T, Error>;
