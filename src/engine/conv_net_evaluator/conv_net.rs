use std::path::Path;

use serde::{Deserialize, Serialize};
use tch::{nn, Device, Tensor};

use crate::encoder::{num_planes, DEFAULT_HISTORY};
use crate::engine::conv_net_evaluator::policy_head::PolicyHead;
use crate::engine::conv_net_evaluator::residual_block::ResidualBlock;
use crate::engine::conv_net_evaluator::value_head::ValueHead;
use crate::error::Result;

/// Architecture and optimiser settings of a [`ConvNet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvNetConfig {
    /// Time steps in the input state; fixes the number of input planes
    pub history: usize,
    pub num_residual_blocks: usize,
    pub num_filters: i64,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
}

impl ConvNetConfig {
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history.max(1);
        self
    }

    pub fn with_tower(mut self, num_residual_blocks: usize, num_filters: i64) -> Self {
        self.num_residual_blocks = num_residual_blocks;
        self.num_filters = num_filters;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn input_planes(&self) -> i64 {
        num_planes(self.history) as i64
    }
}

impl Default for ConvNetConfig {
    fn default() -> Self {
        Self {
            history: DEFAULT_HISTORY,
            num_residual_blocks: 4,
            num_filters: 64,
            learning_rate: 1e-3,
            batch_size: 256,
            epochs: 10,
        }
    }
}

#[derive(Debug)]
pub struct ConvNet {
    pub vs: nn::VarStore,
    pub config: ConvNetConfig,
    conv1: nn::Conv2D,
    bn1: nn::BatchNorm,
    residual_blocks: Vec<ResidualBlock>,
    policy_head: PolicyHead,
    value_head: ValueHead,
}

impl ConvNet {
    pub fn new(device: Device, config: ConvNetConfig) -> ConvNet {
        let vs = nn::VarStore::new(device);
        let root = vs.root();
        let num_filters = config.num_filters;

        let conv1 = nn::conv2d(
            &root / "conv1",
            config.input_planes(),
            num_filters,
            3,
            nn::ConvConfig { padding: 1, bias: false, ..Default::default() },
        );
        let bn1 = nn::batch_norm2d(&root / "bn1", num_filters, Default::default());
        let residual_blocks = (0..config.num_residual_blocks)
            .map(|i| ResidualBlock::new(&(&root / "tower" / i), num_filters))
            .collect();
        let policy_head = PolicyHead::new(&(&root / "policy"), num_filters);
        let value_head = ValueHead::new(&(&root / "value"), num_filters);

        ConvNet {
            vs,
            config,
            conv1,
            bn1,
            residual_blocks,
            policy_head,
            value_head,
        }
    }

    /// Policy logits (`batch x 4672`) and values (`batch x 1`) for `batch x planes x 8 x 8` input.
    pub fn forward(&self, x: &Tensor, train: bool) -> (Tensor, Tensor) {
        let mut x = x
            .view([-1, self.config.input_planes(), 8, 8])
            .apply(&self.conv1)
            .apply_t(&self.bn1, train)
            .relu();
        for block in &self.residual_blocks {
            x = block.forward(&x, train);
        }
        (self.policy_head.forward(&x, train), self.value_head.forward(&x, train))
    }

    /// A network with the same architecture and a copy of this one's weights.
    pub fn try_clone(&self) -> Result<ConvNet> {
        let mut copy = ConvNet::new(self.vs.device(), self.config.clone());
        copy.vs.copy(&self.vs)?;
        Ok(copy)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.vs.save(path)?;
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.vs.load(path)?;
        Ok(())
    }
}
