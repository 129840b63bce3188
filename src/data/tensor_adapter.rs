// ============================================================
// Layer 4 — Tensor Adapter
// ============================================================
// Converts window samples into device-resident Burn tensors
// and reads tensors back into host Vec<f64>.
//
// Shapes produced:
//   inputs(samples)   → [n, width]                  (batch evaluation)
//   sequence(sample)  → [sequence_length, 1, input_size]  (one training step)
//   target(sample)    → [1, 1]
//
// Values enter as f64. The tensor keeps whatever float
// precision the backend was built with (f64 for NdArray<f64>).

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::domain::window::WindowSample;

/// Holds the target device so tensors are created on the
/// device chosen for the run.
#[derive(Clone, Debug)]
pub struct TensorAdapter<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TensorAdapter<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack every sample's input window into one [n, width] matrix.
    pub fn inputs(&self, samples: &[WindowSample]) -> Tensor<B, 2> {
        let rows  = samples.len();
        let width = samples.first().map(WindowSample::width).unwrap_or(0);

        let flat: Vec<f64> = samples
            .iter()
            .flat_map(|s| s.input.iter().copied())
            .collect();

        self.matrix(flat, [rows, width])
    }

    /// One sample's input, sequence-first: [sequence_length, 1, input_size].
    pub fn sequence(
        &self,
        sample:          &WindowSample,
        sequence_length: usize,
        input_size:      usize,
    ) -> Tensor<B, 3> {
        let data = TensorData::new(sample.input.clone(), [sequence_length, 1, input_size]);
        Tensor::<B, 3>::from_data(data, &self.device)
    }

    /// One sample's target as a [1, 1] tensor.
    pub fn target(&self, sample: &WindowSample) -> Tensor<B, 2> {
        self.matrix(vec![sample.target], [1, 1])
    }

    fn matrix(&self, flat: Vec<f64>, shape: [usize; 2]) -> Tensor<B, 2> {
        Tensor::<B, 2>::from_data(TensorData::new(flat, shape), &self.device)
    }
}

/// Move a tensor to host memory as a flat Vec<f64>.
pub fn to_host<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f64>> {
    tensor
        .into_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| anyhow!("Cannot read tensor back to host: {e:?}"))
}
