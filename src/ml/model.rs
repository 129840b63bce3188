// ============================================================
// Layer 5 — Sequence Model
// ============================================================
// Stacked LSTM over one window, read out by a linear head on
// the hidden state of the last time step.

use burn::{
    nn::{Linear, LinearConfig, Lstm, LstmConfig},
    prelude::*,
};

/// What the training loop and the evaluator need from a model.
///
/// Parameter iteration and state export/import come from
/// Burn's `Module` (`into_record`, `load_record`, `num_params`).
pub trait SequenceModel<B: Backend>: Module<B> {
    /// input: [sequence_length, batch, input_size] → [batch, 1]
    fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2>;

    /// batch: [n, sequence_length * input_size] → [n, 1]
    fn predict(&self, batch: Tensor<B, 2>) -> Tensor<B, 2>;

    /// (sequence_length, input_size) of one input sequence.
    fn sequence_shape(&self) -> (usize, usize);

    /// Flat width of one input window.
    fn input_width(&self) -> usize {
        let (seq, features) = self.sequence_shape();
        seq * features
    }
}

#[derive(Config, Debug)]
pub struct SequenceRegressorConfig {
    pub input_size:      usize,
    pub hidden_size:     usize,
    pub sequence_length: usize,
    pub num_layers:      usize,
}

impl SequenceRegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SequenceRegressor<B> {
        let layers: Vec<Lstm<B>> = (0..self.num_layers.max(1))
            .map(|i| {
                let d_input = if i == 0 { self.input_size } else { self.hidden_size };
                LstmConfig::new(d_input, self.hidden_size, true).init(device)
            })
            .collect();
        let head = LinearConfig::new(self.hidden_size, 1).init(device);
        SequenceRegressor {
            layers,
            head,
            sequence_length: self.sequence_length,
            input_size:      self.input_size,
        }
    }
}

/// Stacked LSTM layers with a linear head on the last time step.
#[derive(Module, Debug)]
pub struct SequenceRegressor<B: Backend> {
    pub layers:          Vec<Lstm<B>>,
    pub head:            Linear<B>,
    pub sequence_length: usize,
    pub input_size:      usize,
}

impl<B: Backend> SequenceModel<B> for SequenceRegressor<B> {
    fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        // Burn's LSTM is batch-first: [seq, batch, f] → [batch, seq, f]
        let mut x = input.swap_dims(0, 1);
        for layer in &self.layers {
            let (output, _state) = layer.forward(x, None);
            x = output;
        }

        let [batch, seq_len, hidden] = x.dims();
        let last = x
            .slice([0..batch, seq_len - 1..seq_len, 0..hidden])
            .reshape([batch, hidden]);

        self.head.forward(last)
    }

    fn predict(&self, batch: Tensor<B, 2>) -> Tensor<B, 2> {
        let [n, _] = batch.dims();
        let sequences = batch
            .reshape([n, self.sequence_length, self.input_size])
            .swap_dims(0, 1);
        self.forward(sequences)
    }

    fn sequence_shape(&self) -> (usize, usize) {
        (self.sequence_length, self.input_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::context::RunContext;

    type TestBackend = burn::backend::NdArray<f64>;

    fn config() -> SequenceRegressorConfig {
        SequenceRegressorConfig::new(2, 4, 3, 2)
    }

    #[test]
    fn test_forward_returns_one_value_per_sequence() {
        let ctx   = RunContext::<TestBackend>::new(Default::default(), 0);
        let model = config().init(&ctx.device);

        let input = Tensor::<TestBackend, 3>::zeros([3, 5, 2], &ctx.device);
        assert_eq!(model.forward(input).dims(), [5, 1]);
    }

    #[test]
    fn test_predict_matches_forward_on_reshaped_rows() {
        let ctx    = RunContext::<TestBackend>::new(Default::default(), 0);
        let device = ctx.device;
        let model: SequenceRegressor<TestBackend> = config().init(&device);

        let row: Vec<f64> = (0..6).map(|v| v as f64 / 10.0).collect();
        let batch = Tensor::<TestBackend, 2>::from_data(TensorData::new(row.clone(), [1, 6]), &device);
        let seq   = Tensor::<TestBackend, 3>::from_data(TensorData::new(row, [3, 1, 2]), &device);

        let a = model.predict(batch).into_data().to_vec::<f64>().unwrap();
        let b = model.forward(seq).into_data().to_vec::<f64>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_layer_stack_and_width() {
        let ctx   = RunContext::<TestBackend>::new(Default::default(), 0);
        let model: SequenceRegressor<TestBackend> = config().init(&ctx.device);
        assert_eq!(model.layers.len(), 2);
        assert_eq!(model.input_width(), 6);
        assert!(model.num_params() > 0);
    }
}
