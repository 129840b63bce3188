// ============================================================
// Layer 3 — Window Sample
// ============================================================
// One supervised pair carved out of a single column:
//   input  — `time_window - 1` consecutive raw values
//   target — the value the model should predict
//
// Example (time_window = 4, values = v0..v7):
//   input  = [v0, v1, v2]
//   target = v4
// (see data::windowing for the exact index rule)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSample {
    pub input:  Vec<f64>,
    pub target: f64,
}

impl WindowSample {
    pub fn new(input: Vec<f64>, target: f64) -> Self {
        Self { input, target }
    }

    /// An all-zero sample of the given input width.
    pub fn zeroed(width: usize) -> Self {
        Self { input: vec![0.0; width], target: 0.0 }
    }

    pub fn width(&self) -> usize {
        self.input.len()
    }

    pub fn is_zeroed(&self) -> bool {
        self.target == 0.0 && self.input.iter().all(|&v| v == 0.0)
    }
}
