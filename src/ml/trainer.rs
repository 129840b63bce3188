// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Per-sample gradient descent with Adam over windowed pairs.
//
// States:
//   Idle → EpochRunning → StepRunning → ... → Completed
//
// One step, for one window sample:
//   1. Gradients start empty: Burn builds a fresh gradient
//      set for every backward pass, nothing accumulates
//   2. Forward pass on the input as [seq_len, 1, input_size]
//   3. loss = MSE(prediction, target)
//   4. Backward pass
//   5. Adam update with the configured learning rate
//
// Steps are strictly sequential: each one starts from the
// parameters the previous one produced.

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, Adam, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::marker::PhantomData;
use thiserror::Error;

use crate::data::tensor_adapter::TensorAdapter;
use crate::domain::traits::{EpochSummary, ProgressSink, StepProgress};
use crate::domain::window::WindowSample;
use crate::ml::criterion::Criterion;
use crate::ml::model::SequenceModel;

/// Adam bound to a concrete model type.
pub type AdamOptimizer<B, M> = OptimizerAdaptor<Adam, M, B>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Idle,
    EpochRunning { epoch: usize },
    StepRunning { epoch: usize, step: usize },
    Completed,
}

#[derive(Debug, Error, PartialEq)]
pub enum TrainError {
    #[error("loss became {loss} at epoch {epoch}, step {step}")]
    NonFiniteLoss { epoch: usize, step: usize, loss: f64 },

    #[error("sample {index} has {actual} inputs, the model expects {expected}")]
    WidthMismatch { index: usize, expected: usize, actual: usize },

    #[error("this trainer already completed its run")]
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig {
    pub num_epochs: usize,
    pub lr:         f64,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    /// Loss of every step, in order
    pub step_losses: Vec<f64>,
    pub epochs:      Vec<EpochSummary>,
}

impl TrainReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.step_losses.last().copied()
    }
}

/// Owns the optimizer and criterion for one run.
pub struct Trainer<B: AutodiffBackend, M, O> {
    optim:     O,
    criterion: Criterion,
    adapter:   TensorAdapter<B>,
    config:    TrainerConfig,
    state:     TrainerState,
    _model:    PhantomData<fn() -> M>,
}

impl<B, M, O> Trainer<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + SequenceModel<B>,
    O: Optimizer<M, B>,
{
    pub fn new(optim: O, criterion: Criterion, adapter: TensorAdapter<B>, config: TrainerConfig) -> Self {
        Self {
            optim,
            criterion,
            adapter,
            config,
            state: TrainerState::Idle,
            _model: PhantomData,
        }
    }

    pub fn state(&self) -> TrainerState { self.state }

    pub fn optimizer(&self) -> &O { &self.optim }

    pub fn criterion(&self) -> &Criterion { &self.criterion }

    /// Run every epoch over `samples` and hand back the trained model.
    ///
    /// Any failed step aborts the whole run; there is no retry.
    pub fn fit(
        &mut self,
        mut model: M,
        samples:   &[WindowSample],
        sink:      &mut dyn ProgressSink,
    ) -> Result<(M, TrainReport)> {
        if self.state == TrainerState::Completed {
            return Err(TrainError::AlreadyCompleted.into());
        }

        let expected = model.input_width();
        if let Some((index, sample)) = samples.iter().enumerate().find(|(_, s)| s.width() != expected) {
            return Err(TrainError::WidthMismatch { index, expected, actual: sample.width() }.into());
        }

        let total_steps = samples.len();
        let mut report  = TrainReport::default();

        for epoch in 1..=self.config.num_epochs {
            self.state = TrainerState::EpochRunning { epoch };
            let mut loss_sum = 0.0f64;

            for (step, sample) in samples.iter().enumerate() {
                self.state = TrainerState::StepRunning { epoch, step };

                let (next, loss) = self.step(model, sample);
                model = next;

                if !loss.is_finite() {
                    return Err(TrainError::NonFiniteLoss { epoch, step, loss }.into());
                }

                loss_sum += loss;
                report.step_losses.push(loss);

                sink.on_step(&StepProgress {
                    epoch,
                    total_epochs: self.config.num_epochs,
                    step,
                    total_steps,
                    loss,
                });
            }

            self.state = TrainerState::EpochRunning { epoch };
            let summary = EpochSummary {
                epoch,
                mean_loss:  if total_steps > 0 { loss_sum / total_steps as f64 } else { f64::NAN },
                final_loss: report.final_loss().unwrap_or(f64::NAN),
            };
            sink.on_epoch_end(&summary)?;
            report.epochs.push(summary);
        }

        self.state = TrainerState::Completed;
        tracing::info!("Training complete after {} epochs", self.config.num_epochs);
        Ok((model, report))
    }

    fn step(&mut self, model: M, sample: &WindowSample) -> (M, f64) {
        let (seq_len, input_size) = model.sequence_shape();
        let input  = self.adapter.sequence(sample, seq_len, input_size);
        let target = self.adapter.target(sample);

        let prediction = model.forward(input);
        let loss       = self.criterion.forward(prediction, target);
        let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        let model = self.optim.step(self.config.lr, model, grads);

        (model, loss_value)
    }
}
