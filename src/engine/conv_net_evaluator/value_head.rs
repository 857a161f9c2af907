use tch::{nn, Tensor};

const VALUE_CHANNELS: i64 = 32;
const HIDDEN_UNITS: i64 = 128;

#[derive(Debug)]
pub struct ValueHead {
    conv: nn::Conv2D,
    bn1: nn::BatchNorm, // after conv
    fc1: nn::Linear,
    bn2: nn::BatchNorm, // after fc1
    fc2: nn::Linear,
}

impl ValueHead {
    pub fn new(vs: &nn::Path, num_filters: i64) -> Self {
        ValueHead {
            conv: nn::conv2d(vs / "conv", num_filters, VALUE_CHANNELS, 1, Default::default()),
            bn1: nn::batch_norm2d(vs / "bn1", VALUE_CHANNELS, Default::default()),
            fc1: nn::linear(vs / "fc1", VALUE_CHANNELS * 8 * 8, HIDDEN_UNITS, Default::default()),
            bn2: nn::batch_norm1d(vs / "bn2", HIDDEN_UNITS, Default::default()),
            fc2: nn::linear(vs / "fc2", HIDDEN_UNITS, 1, Default::default()),
        }
    }

    /// Values of shape `batch x 1`, squashed into [-1, 1].
    pub fn forward(&self, x: &Tensor, train: bool) -> Tensor {
        x.apply(&self.conv)
            .apply_t(&self.bn1, train)
            .relu()
            .flatten(1, -1)
            .apply(&self.fc1)
            .apply_t(&self.bn2, train)
            .relu()
            .apply(&self.fc2)
            .tanh()
    }
}
