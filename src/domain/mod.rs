// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that describe a
// training run independently of the deep-learning engine.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything here can be unit tested without a backend.

// Immutable per-run configuration and the device designator
pub mod run_config;

// Per-epoch loss / accuracy history for one run
pub mod history;

// Core abstractions (traits) that other layers implement
pub mod traits;
