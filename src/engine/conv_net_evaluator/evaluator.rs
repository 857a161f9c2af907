use std::path::Path;

use tch::Kind;

use crate::encoder::GameState;
use crate::engine::conv_net_evaluator::conv_net::{ConvNet, ConvNetConfig};
use crate::engine::conv_net_evaluator::train::fit;
use crate::engine::conv_net_evaluator::utils::{state_to_tensor, DEVICE};
use crate::engine::evaluation::{Evaluator, Prediction, TrainableModel};
use crate::engine::self_play::LabeledExample;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct ConvNetEvaluator {
    pub model: ConvNet,
}

impl ConvNetEvaluator {
    pub fn new(config: ConvNetConfig) -> ConvNetEvaluator {
        ConvNetEvaluator { model: ConvNet::new(*DEVICE, config) }
    }

    pub fn load(config: ConvNetConfig, path: &Path) -> Result<ConvNetEvaluator> {
        let mut evaluator = ConvNetEvaluator::new(config);
        evaluator.model.load(path)?;
        Ok(evaluator)
    }
}

impl Evaluator for ConvNetEvaluator {
    fn predict(&self, state: &GameState) -> Result<Prediction> {
        if state.history() != self.model.config.history {
            return Err(Error::Evaluation(format!(
                "network expects {} time steps, state has {}",
                self.model.config.history,
                state.history()
            )));
        }

        let (policy, value) = tch::no_grad(|| {
            let (logits, value) = self.model.forward(&state_to_tensor(state), false);
            (logits.softmax(-1, Kind::Float).view([-1]), value.double_value(&[0, 0]))
        });
        Ok(Prediction {
            policy: Vec::<f32>::try_from(&policy)?,
            value: value as f32,
        })
    }
}

impl TrainableModel for ConvNetEvaluator {
    fn train(&self, examples: &[LabeledExample]) -> Result<Self> {
        let mut model = self.model.try_clone()?;
        fit(&mut model, examples)?;
        Ok(ConvNetEvaluator { model })
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.model.save(path)
    }
}
