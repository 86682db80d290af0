// ============================================================
// Layer 5 — ML Layer (Burn)
// ============================================================
// Everything that touches model parameters or tensors during
// a run lives here:
//
//   model.rs        — ImageClassifier trait and the demo TinyCnn
//   loss.rs         — summed NLL, argmax predictions, pass totals
//   penalty.rs      — optional loss terms (L1)
//   schedule.rs     — per-epoch learning-rate step decay
//   trainer.rs      — one training pass with optimiser updates
//   evaluator.rs    — one no-grad evaluation pass + checkpoint
//   orchestrator.rs — the epoch loop, early stop, and the final
//                     misclassification scan
//   backend.rs      — concrete CPU / GPU backend aliases
//
// The trainer runs on an AutodiffBackend. The evaluator runs
// on the inner backend through `model.valid()`, which is how
// Burn separates training mode from evaluation mode.

/// Concrete backends and devices
pub mod backend;

/// Classifier trait and demo CNN
pub mod model;

/// Loss and accuracy helpers shared by every pass
pub mod loss;

/// Loss penalties added before the backward pass
pub mod penalty;

/// Learning-rate schedule advanced once per epoch
pub mod schedule;

/// One training pass
pub mod trainer;

/// One evaluation pass with optional checkpointing
pub mod evaluator;

/// Epoch loop with early stopping
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;
