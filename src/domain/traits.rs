// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// concrete implementations (CSV files, stdout progress) can be
// swapped in tests.

use anyhow::Result;
use crate::domain::series::RawDataset;

// ─── SeriesSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a table of observations.
///
/// Implementations:
///   - CsvLoader → reads a delimited file with a header row
pub trait SeriesSource {
    /// Load the whole table into memory.
    fn load(&self) -> Result<RawDataset>;
}

// ─── ProgressSink ─────────────────────────────────────────────────────────────
/// Receives training feedback. Purely observational: nothing
/// reported here is persisted as run state.
pub trait ProgressSink {
    /// Called after every optimisation step.
    fn on_step(&mut self, progress: &StepProgress);

    /// Called once an epoch has gone through every sample.
    fn on_epoch_end(&mut self, summary: &EpochSummary) -> Result<()>;
}

/// Snapshot reported after one optimisation step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepProgress {
    /// 1-based epoch number
    pub epoch:        usize,
    pub total_epochs: usize,
    /// 0-based index of the sample just trained on
    pub step:         usize,
    pub total_steps:  usize,
    pub loss:         f64,
}

impl StepProgress {
    /// Share of the epoch done before this step, in percent.
    pub fn percent_complete(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        self.step as f64 / self.total_steps as f64 * 100.0
    }
}

/// Loss statistics for one finished epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub epoch:      usize,
    pub mean_loss:  f64,
    pub final_loss: f64,
}
