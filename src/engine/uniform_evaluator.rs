use crate::codec::NUM_ACTIONS;
use crate::encoder::GameState;
use crate::engine::evaluation::{Evaluator, Prediction};
use crate::error::Result;

/// Flat prior over every action and a neutral value. The search masks the prior to the legal
/// moves, so this is plain PUCT without any learned knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn predict(&self, _state: &GameState) -> Result<Prediction> {
        Ok(Prediction {
            policy: vec![1. / NUM_ACTIONS as f32; NUM_ACTIONS],
            value: 0.,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::ChessPosition;
    use super::*;

    #[test]
    fn test_uniform_prediction() {
        let state = GameState::new(&ChessPosition::initial(), 1);
        let prediction = UniformEvaluator.predict(&state).unwrap();
        assert_eq!(prediction.policy.len(), NUM_ACTIONS);
        assert!((prediction.policy.iter().sum::<f32>() - 1.).abs() < 1e-3);
        assert_eq!(prediction.value, 0.);
    }
}
