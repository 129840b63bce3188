// ============================================================
// Layer 5 — ML Layer (Burn)
// ============================================================
// All model, optimisation and scoring code lives here.
//
//   context.rs   — device + seed of one run
//   model.rs     — SequenceModel trait and the stacked-LSTM
//                  regressor that implements it
//   criterion.rs — MSE loss with a serialisable state
//   trainer.rs   — per-sample training loop (Adam)
//   progress.rs  — stdout progress line + metrics CSV hook
//   scores.rs    — R² and mean squared log error
//   evaluator.rs — batched inference over held-out windows

pub mod context;
pub mod model;
pub mod criterion;
pub mod trainer;
pub mod progress;
pub mod scores;
pub mod evaluator;
