// ============================================================
// Layer 5 — Evaluation Step
// ============================================================
// Runs the inference (non-autodiff) model over every held-out
// window in one batch, copies predictions to the host and
// exposes R² and MSLE over them.
//
// The two scores are computed on demand so the caller can
// use R² (e.g. to name a checkpoint) before MSLE, which fails
// on negative values, is asked for.

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::data::tensor_adapter::{to_host, TensorAdapter};
use crate::domain::window::WindowSample;
use crate::ml::model::SequenceModel;
use crate::ml::scores::{mean_squared_log_error, r2_score, MetricError};

/// Host-side predictions next to their targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predictions: Vec<f64>,
    pub targets:     Vec<f64>,
}

impl Evaluation {
    /// R² with the predictions as the reference series.
    pub fn r2(&self) -> Result<f64, MetricError> {
        r2_score(&self.predictions, &self.targets)
    }

    pub fn msle(&self) -> Result<f64, MetricError> {
        mean_squared_log_error(&self.targets, &self.predictions)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

pub fn evaluate<B: Backend, M: SequenceModel<B>>(
    model:   &M,
    samples: &[WindowSample],
    adapter: &TensorAdapter<B>,
) -> Result<Evaluation> {
    ensure!(!samples.is_empty(), "No samples to evaluate");

    let expected = model.input_width();
    if let Some(bad) = samples.iter().find(|s| s.width() != expected) {
        anyhow::bail!(
            "Evaluation sample has {} inputs, the model expects {}",
            bad.width(),
            expected
        );
    }

    let predictions = to_host(model.predict(adapter.inputs(samples)))?;
    let targets: Vec<f64> = samples.iter().map(|s| s.target).collect();

    tracing::debug!("Evaluated {} samples", targets.len());
    Ok(Evaluation { predictions, targets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::context::RunContext;
    use crate::ml::model::{SequenceRegressor, SequenceRegressorConfig};

    type TestBackend = burn::backend::NdArray<f64>;

    #[test]
    fn test_one_prediction_per_sample() {
        let ctx = RunContext::new(Default::default(), 0);
        let model: SequenceRegressor<TestBackend> = SequenceRegressorConfig::new(1, 2, 3, 1).init(&ctx.device);
        let samples = vec![
            WindowSample::new(vec![0.1, 0.2, 0.3], 0.5),
            WindowSample::new(vec![0.4, 0.5, 0.6], 0.8),
        ];

        let eval = evaluate(&model, &samples, &ctx.adapter()).unwrap();
        assert_eq!(eval.len(), 2);
        assert_eq!(eval.predictions.len(), 2);
        assert_eq!(eval.targets, vec![0.5, 0.8]);
    }

    #[test]
    fn test_empty_or_mismatched_input_rejected() {
        let ctx = RunContext::new(Default::default(), 0);
        let model: SequenceRegressor<TestBackend> = SequenceRegressorConfig::new(1, 2, 3, 1).init(&ctx.device);
        let adapter = ctx.adapter();

        assert!(evaluate(&model, &[], &adapter).is_err());
        assert!(evaluate(&model, &[WindowSample::new(vec![1.0], 1.0)], &adapter).is_err());
    }

    #[test]
    fn test_scores_on_exact_predictions() {
        let eval = Evaluation { predictions: vec![1.0, 2.0, 3.0], targets: vec![1.0, 2.0, 3.0] };
        assert_eq!(eval.r2().unwrap(), 1.0);
        assert_eq!(eval.msle().unwrap(), 0.0);
    }

    #[test]
    fn test_r2_measured_around_prediction_mean() {
        let eval = Evaluation { predictions: vec![1.5, 2.0, 2.5], targets: vec![1.0, 2.0, 3.0] };
        assert!(eval.r2().unwrap().abs() < 1e-12);

        let flat = Evaluation { predictions: vec![2.0, 2.0], targets: vec![1.0, 3.0] };
        assert_eq!(flat.r2().unwrap(), 0.0);
    }

    #[test]
    fn test_negative_targets_fail_msle_only() {
        let eval = Evaluation { predictions: vec![-1.0, 2.0], targets: vec![-1.0, 2.0] };
        assert_eq!(eval.r2().unwrap(), 1.0);
        assert!(matches!(eval.msle(), Err(MetricError::NegativeValue { .. })));
    }
}
