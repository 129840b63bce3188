// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of a run:
//
//   checkpoint.rs     — Saving and restoring model, optimizer
//                       and criterion as one bundle file.
//                       Load failures come back as a typed
//                       error; the caller picks the fallback.
//
//   metrics.rs        — Per-epoch loss log, appended to a CSV
//                       file for plotting learning curves.
//
//   settings_store.rs — Reads the TOML settings file.

/// Checkpoint bundle saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Settings file loading
pub mod settings_store;
