// ============================================================
// Layer 4 — Windowing Transform
// ============================================================
// Turns one column of N raw values into supervised samples
// using non-overlapping blocks of `time_window` (W) values.
//
// Sample count:
//   size = floor(N / W) + (N mod W)
//
// Populated samples, for i = W, 2W, 3W, ... while i < N:
//   input  = values[i - W .. i - 1]     (W - 1 values)
//   target = values[i]
//
// The value at i - 1 belongs to no sample, and the target is
// the first value of the *next* block. Every slot after the
// last populated one is an all-zero sample. Both rules are
// kept exactly as the series was always windowed, so saved
// runs stay comparable.
//
//   W = 3, N = 7, values v0..v6
//   size = 2 + 1 = 3
//     i = 3 → input [v0, v1], target v3
//     i = 6 → input [v3, v4], target v6
//     slot 2 → input [0, 0],  target 0

use thiserror::Error;

use crate::domain::window::WindowSample;

#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("time_window must be at least 2, got {0}")]
    WindowTooSmall(usize),
}

/// Number of samples produced for `rows` raw values.
fn sample_count(rows: usize, time_window: usize) -> usize {
    rows / time_window + rows % time_window
}

/// Lazily yields the populated samples, in row order. Empty when
/// `time_window` is below 2.
fn windows(values: &[f64], time_window: usize) -> impl Iterator<Item = WindowSample> + '_ {
    let start = if time_window < 2 { values.len() } else { time_window };
    (start..values.len())
        .step_by(time_window.max(1))
        .map(move |i| WindowSample::new(values[i - time_window..i - 1].to_vec(), values[i]))
}

/// The output of the transform: samples plus how many are real.
#[derive(Debug, Clone, PartialEq)]
pub struct Windowed {
    pub samples:   Vec<WindowSample>,
    /// Leading samples that came from raw values; the rest are zero-filled
    pub populated: usize,
}

impl Windowed {
    /// Drop the zero-filled tail.
    pub fn into_populated(mut self) -> Vec<WindowSample> {
        self.samples.truncate(self.populated);
        self.samples
    }
}

/// Build the full windowed dataset, zero tail included.
pub fn create_sequence(values: &[f64], time_window: usize) -> Result<Windowed, WindowError> {
    if time_window < 2 {
        return Err(WindowError::WindowTooSmall(time_window));
    }

    let size  = sample_count(values.len(), time_window);
    let width = time_window - 1;

    let mut samples: Vec<WindowSample> = windows(values, time_window).take(size).collect();
    let populated = samples.len();
    samples.resize_with(size, || WindowSample::zeroed(width));

    tracing::debug!(
        "Windowed {} values (W={}) into {} samples, {} zero-filled",
        values.len(),
        time_window,
        size,
        size - populated,
    );

    Ok(Windowed { samples, populated })
}
