// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - mean_loss:  average MSE over every step of the epoch
//   - final_loss: MSE of the last step of the epoch
//
// Example CSV output:
//   epoch,mean_loss,final_loss
//   1,0.012345,0.009876
//   2,0.006543,0.005432
//   ...
//
// The file is appended to across runs; the header is only
// written when the file is created.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,mean_loss,final_loss";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average loss over all steps of the epoch
    pub mean_loss: f64,

    /// Loss of the last step; noisy, but shows where the epoch ended
    pub final_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, mean_loss: f64, final_loss: f64) -> Self {
        Self { epoch, mean_loss, final_loss }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger writing to `path`.
    /// Creates missing parent directories and writes the header
    /// if the file doesn't exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = path.into();

        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create metrics directory '{}'", parent.display()))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create metrics file '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open metrics file '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.8},{:.8}", m.epoch, m.mean_loss, m.final_loss)?;

        tracing::debug!(
            "Logged epoch {} metrics: mean_loss={:.6}, final_loss={:.6}",
            m.epoch,
            m.mean_loss,
            m.final_loss,
        );

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_rows_under_one_header() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("metrics.csv");

        let logger = MetricsLogger::new(&path).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.25)).unwrap();

        // a second logger on the same file keeps the existing rows
        let again = MetricsLogger::new(&path).unwrap();
        again.log(&EpochMetrics::new(2, 0.125, 0.0625)).unwrap();

        let text  = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![HEADER, "1,0.50000000,0.25000000", "2,0.12500000,0.06250000"]
        );
    }
}
