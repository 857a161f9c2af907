use std::path::Path;

use crate::codec::NUM_ACTIONS;
use crate::encoder::GameState;
use crate::engine::self_play::LabeledExample;
use crate::error::{Error, Result};
use crate::rules::Position;

/// Reward of a finished game from the perspective of the side to move: the mated side gets -1,
/// every draw 0. Positions that are not over count as 0.
pub fn terminal_value<P: Position>(position: &P) -> f32 {
    match position.outcome() {
        Some(outcome) => outcome.reward_for(position.side_to_move()),
        None => 0.,
    }
}

/// Output of the evaluation model for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// One entry per action id. Not masked to the legal moves; the search does that.
    pub policy: Vec<f32>,
    /// Expected reward for the side to move, in [-1, 1].
    pub value: f32,
}

impl Prediction {
    pub fn check(self) -> Result<Self> {
        if self.policy.len() != NUM_ACTIONS {
            return Err(Error::Evaluation(format!(
                "expected a policy over {} actions, got {}",
                NUM_ACTIONS,
                self.policy.len()
            )));
        }
        if let Some((action, p)) = self.policy.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(Error::Evaluation(format!("non-finite prior {} for action {}", p, action)));
        }
        if !self.value.is_finite() {
            return Err(Error::Evaluation(format!("non-finite value {}", self.value)));
        }
        Ok(Self { value: self.value.clamp(-1., 1.), ..self })
    }
}

pub trait Evaluator {
    fn predict(&self, state: &GameState) -> Result<Prediction>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        (**self).predict(state)
    }
}

/// A model the training loop can improve and persist.
pub trait TrainableModel: Evaluator + Sized {
    /// Returns a new model fitted to `examples`, leaving `self` untouched so the two can be compared.
    fn train(&self, examples: &[LabeledExample]) -> Result<Self>;

    fn save(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chess::ChessMove;

    use crate::rules::ChessPosition;
    use super::*;

    #[test]
    fn test_terminal_value() {
        let mut position = ChessPosition::initial();
        assert_eq!(terminal_value(&position), 0.);
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            position.push(ChessMove::from_str(uci).unwrap()).unwrap();
        }
        assert_eq!(terminal_value(&position), -1.);

        let stalemate = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(terminal_value(&stalemate), 0.);
    }

    #[test]
    fn test_prediction_check() {
        let short = Prediction { policy: vec![0.; 10], value: 0. };
        assert!(matches!(short.check(), Err(Error::Evaluation(_))));

        let nan = Prediction { policy: vec![0.; NUM_ACTIONS], value: f32::NAN };
        assert!(matches!(nan.check(), Err(Error::Evaluation(_))));

        let mut policy = vec![0.; NUM_ACTIONS];
        policy[17] = f32::INFINITY;
        let infinite = Prediction { policy, value: 0. };
        assert!(matches!(infinite.check(), Err(Error::Evaluation(_))));

        let loud = Prediction { policy: vec![0.; NUM_ACTIONS], value: 3. };
        assert_eq!(loud.check().unwrap().value, 1.);
    }
}
