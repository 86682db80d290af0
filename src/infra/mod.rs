// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of a run:
//
//   checkpoint.rs — model weights (.pth) and train_config.json
//   metrics.rs    — per-epoch metrics appended to metrics.csv
//   report.rs     — misclassified.json written after a run
//
// All three write under the run's checkpoint directory.

/// Model checkpoint and run-config persistence
pub mod checkpoint;

/// Per-epoch metrics CSV logger
pub mod metrics;

/// Misclassification report writer
pub mod report;
