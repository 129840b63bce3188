// ============================================================
// Layer 5 — Console Progress
// ============================================================
// Live per-step line on stdout plus one log record and an
// optional CSV row per finished epoch.

use anyhow::Result;
use std::io::{self, Write};

use crate::domain::traits::{EpochSummary, ProgressSink, StepProgress};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};

/// Rewrites one progress line on stdout after every step and
/// optionally appends each finished epoch to a metrics CSV.
pub struct ConsoleProgress {
    logger: Option<MetricsLogger>,
}

impl ConsoleProgress {
    pub fn new(logger: Option<MetricsLogger>) -> Self {
        Self { logger }
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_step(&mut self, p: &StepProgress) {
        print!(
            "\r epoch: {:3}/{:3}, loss: {:10.8}, completed: {:.2}%",
            p.epoch,
            p.total_epochs,
            p.loss,
            p.percent_complete(),
        );
        let _ = io::stdout().flush();
    }

    fn on_epoch_end(&mut self, s: &EpochSummary) -> Result<()> {
        println!("\n");
        tracing::info!(
            "Epoch {} done: mean_loss={:.8}, final_loss={:.8}",
            s.epoch,
            s.mean_loss,
            s.final_loss,
        );

        if let Some(logger) = &self.logger {
            logger.log(&EpochMetrics::new(s.epoch, s.mean_loss, s.final_loss))?;
        }
        Ok(())
    }
}
