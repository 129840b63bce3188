// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one run. No ML math and
// no file formats here, only workflow coordination.

/// Settings schema and validation
pub mod settings;

/// The train / test workflow
pub mod run_use_case;
