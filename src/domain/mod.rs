// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the forecasting
// problem: a table of observations, the supervised windows
// carved out of it, and the sources that produce tables.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A table of numeric observations loaded from disk
pub mod series;

// One (input window, next value) supervised pair
pub mod window;

// Core abstractions (traits) that other layers implement
pub mod traits;
