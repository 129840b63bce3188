// ============================================================
// Layer 5 — Loss Criterion
// ============================================================
// Mean-squared-error between prediction and target.
//
// MSE has no learnable parameters, but the criterion still
// owns a small serialisable state (kind + reduction) so a
// checkpoint always carries model, optimizer and criterion
// together and a restored run scores loss the same way.

use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MSE: &str = "mse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossReduction {
    Mean,
    Sum,
}

impl From<LossReduction> for Reduction {
    fn from(r: LossReduction) -> Self {
        match r {
            LossReduction::Mean => Reduction::Mean,
            LossReduction::Sum  => Reduction::Sum,
        }
    }
}

/// Serialisable description of the criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionState {
    pub kind:      String,
    pub reduction: LossReduction,
}

#[derive(Debug, Error, PartialEq)]
pub enum CriterionError {
    #[error("unsupported loss '{0}', only 'mse' is available")]
    UnsupportedKind(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    reduction: LossReduction,
}

impl Criterion {
    pub fn mse() -> Self {
        Self { reduction: LossReduction::Mean }
    }

    /// prediction, target: [batch, 1] → scalar loss [1]
    pub fn forward<B: Backend>(&self, prediction: Tensor<B, 2>, target: Tensor<B, 2>) -> Tensor<B, 1> {
        MseLoss::new().forward(prediction, target, self.reduction.into())
    }

    pub fn state(&self) -> CriterionState {
        CriterionState { kind: MSE.to_string(), reduction: self.reduction }
    }

    pub fn from_state(state: CriterionState) -> Result<Self, CriterionError> {
        if state.kind != MSE {
            return Err(CriterionError::UnsupportedKind(state.kind));
        }
        Ok(Self { reduction: state.reduction })
    }
}

impl Default for Criterion {
    fn default() -> Self { Self::mse() }
}
