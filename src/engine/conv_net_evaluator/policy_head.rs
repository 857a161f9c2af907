use tch::{nn, Tensor};

use crate::codec::{NUM_ACTIONS, NUM_PLANES};

#[derive(Debug)]
pub struct PolicyHead {
    conv1: nn::Conv2D,
    bn: nn::BatchNorm,
    conv2: nn::Conv2D,
}

impl PolicyHead {
    pub fn new(vs: &nn::Path, num_filters: i64) -> Self {
        let conv = nn::ConvConfig { padding: 1, ..Default::default() };
        PolicyHead {
            conv1: nn::conv2d(vs / "conv1", num_filters, num_filters, 3, conv),
            bn: nn::batch_norm2d(vs / "bn", num_filters, Default::default()),
            conv2: nn::conv2d(vs / "conv2", num_filters, NUM_PLANES as i64, 3, conv),
        }
    }

    /// Logits of shape `batch x 4672`. The 73 output channels are flattened plane-major,
    /// so column `plane * 64 + square` is exactly that action id.
    pub fn forward(&self, x: &Tensor, train: bool) -> Tensor {
        x.apply(&self.conv1)
            .apply_t(&self.bn, train)
            .relu()
            .apply(&self.conv2)
            .view([-1, NUM_ACTIONS as i64])
    }
}
