use lazy_static::lazy_static;
use tch::{Device, Kind, Tensor};

use crate::encoder::GameState;
use crate::engine::self_play::LabeledExample;

lazy_static! {
    pub static ref DEVICE: Device = Device::cuda_if_available();
}

/// One state as a `1 x planes x 8 x 8` float tensor on [`DEVICE`].
pub fn state_to_tensor(state: &GameState) -> Tensor {
    Tensor::from_slice(&state.to_chw())
        .view([1, state.num_planes() as i64, 8, 8])
        .to_kind(Kind::Float)
        .to_device(*DEVICE)
}

/// Stacks a batch into input planes, target policies and target values.
pub fn batch_to_tensors(batch: &[&LabeledExample], num_planes: i64) -> (Tensor, Tensor, Tensor) {
    let planes: Vec<f32> = batch.iter().flat_map(|example| example.planes.iter().copied()).collect();
    let policies: Vec<f32> = batch.iter().flat_map(|example| example.policy.iter().copied()).collect();
    let values: Vec<f32> = batch.iter().map(|example| example.value).collect();
    let size = batch.len() as i64;

    (
        Tensor::from_slice(&planes).view([size, num_planes, 8, 8]).to_device(*DEVICE),
        Tensor::from_slice(&policies).view([size, -1]).to_device(*DEVICE),
        Tensor::from_slice(&values).view([size, 1]).to_device(*DEVICE),
    )
}
