use log::info;
use rand::seq::SliceRandom;
use tch::nn::OptimizerConfig;
use tch::{nn, Kind};

use crate::codec::NUM_ACTIONS;
use crate::engine::conv_net_evaluator::conv_net::ConvNet;
use crate::engine::conv_net_evaluator::utils::batch_to_tensors;
use crate::engine::self_play::LabeledExample;
use crate::error::{Error, Result};

/// Shuffled mini-batch Adam epochs: cross-entropy against the search policy plus
/// squared error against the game result.
pub fn fit(model: &mut ConvNet, examples: &[LabeledExample]) -> Result<()> {
    let num_planes = model.config.input_planes();
    let input_len = num_planes as usize * 64;
    if let Some(bad) = examples
        .iter()
        .find(|example| example.planes.len() != input_len || example.policy.len() != NUM_ACTIONS)
    {
        return Err(Error::Evaluation(format!(
            "example with {} input values and {} policy entries does not fit the network",
            bad.planes.len(),
            bad.policy.len()
        )));
    }
    if examples.is_empty() {
        return Ok(());
    }

    let mut optimizer = nn::Adam::default().build(&model.vs, model.config.learning_rate)?;
    let mut order: Vec<usize> = (0..examples.len()).collect();
    let mut rng = rand::thread_rng();

    for epoch in 0..model.config.epochs {
        order.shuffle(&mut rng);
        let mut total_loss = 0.;
        let mut num_batches = 0;

        for chunk in order.chunks(model.config.batch_size) {
            // Batch norm needs more than one value per channel in training mode.
            if chunk.len() < 2 {
                continue;
            }
            let batch: Vec<&LabeledExample> = chunk.iter().map(|&i| &examples[i]).collect();
            let (states, policies, values) = batch_to_tensors(&batch, num_planes);

            let (logits, predicted_values) = model.forward(&states, true);
            let policy_loss = -(policies * logits.log_softmax(-1, Kind::Float))
                .sum_dim_intlist(Some([-1i64].as_slice()), false, Kind::Float)
                .mean(Kind::Float);
            let value_loss = predicted_values.mse_loss(&values, tch::Reduction::Mean);
            let loss = policy_loss + value_loss;

            optimizer.backward_step(&loss);
            total_loss += loss.double_value(&[]);
            num_batches += 1;
        }

        if num_batches > 0 {
            info!(
                "Epoch {}/{}: mean loss {:.4} over {} batches",
                epoch + 1,
                model.config.epochs,
                total_loss / num_batches as f64,
                num_batches
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::engine::conv_net_evaluator::conv_net::ConvNetConfig;
    use crate::engine::conv_net_evaluator::utils::DEVICE;
    use crate::engine::conv_net_evaluator::ConvNetEvaluator;
    use crate::engine::evaluation::{Evaluator, TrainableModel};
    use crate::encoder::GameState;
    use crate::rules::ChessPosition;
    use super::*;

    fn example(value: f32) -> LabeledExample {
        let state = GameState::new(&ChessPosition::initial(), 1);
        let mut policy = vec![0.; NUM_ACTIONS];
        policy[8 * 64 + 12] = 1.;
        LabeledExample { planes: state.to_chw(), policy, value }
    }

    #[test]
    fn test_rejects_mismatched_examples() {
        let mut net = ConvNet::new(*DEVICE, ConvNetConfig::default().with_tower(1, 8));
        let bad = LabeledExample { planes: vec![0.; 10], policy: vec![0.; NUM_ACTIONS], value: 0. };
        assert!(matches!(fit(&mut net, &[bad]), Err(Error::Evaluation(_))));
    }

    #[test]
    fn test_training_leaves_the_original_untouched() {
        let config = ConvNetConfig::default().with_tower(1, 8).with_batch_size(4).with_epochs(3);
        let evaluator = ConvNetEvaluator::new(config);
        let state = GameState::new(&ChessPosition::initial(), 1);
        let before = evaluator.predict(&state).unwrap();

        let examples: Vec<LabeledExample> = (0..8).map(|i| example(if i % 2 == 0 { 1. } else { -1. })).collect();
        let trained = evaluator.train(&examples).unwrap();

        let after = evaluator.predict(&state).unwrap();
        assert_eq!(before, after);
        assert_eq!(trained.predict(&state).unwrap().policy.len(), NUM_ACTIONS);
    }
}
