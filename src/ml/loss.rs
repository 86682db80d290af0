// ============================================================
// Layer 5 — Loss and Accuracy Helpers
// ============================================================
// Shared by the trainer, the evaluator, and the final
// misclassification scan so all three count the same way.
//
//   nll_loss_sum   — Σ −log p(target), summed over the batch
//   predictions    — argmax over the class dimension
//   count_correct  — predictions == targets
//   PassStats      — loss/accuracy normalised by dataset size

use burn::prelude::*;

/// Negative log-likelihood summed (not averaged) over the batch.
///
/// log_probs: [batch, classes], targets: [batch] → [1]
pub fn nll_loss_sum<B: Backend>(
    log_probs: Tensor<B, 2>,
    targets:   Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    log_probs
        .gather(1, targets.unsqueeze_dim::<2>(1))
        .sum()
        .neg()
}

/// Index of the max log-probability per row.
///
/// argmax(1) returns [batch, 1]; flattened to [batch].
pub fn predictions<B: Backend>(log_probs: Tensor<B, 2>) -> Tensor<B, 1, Int> {
    log_probs.argmax(1).flatten::<1>(0, 1)
}

pub fn count_correct<B: Backend>(log_probs: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let correct: i64 = predictions(log_probs)
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

/// Read a single-element tensor back to the host.
pub fn scalar<B: Backend>(value: Tensor<B, 1>) -> f64 {
    value.into_scalar().elem::<f64>()
}

/// Totals for one full pass over a data loader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassStats {
    /// Summed loss / dataset size
    pub avg_loss: f64,
    /// 100 × correct / dataset size
    pub accuracy: f64,
    pub correct:  usize,
    pub total:    usize,
}

impl PassStats {
    pub fn new(loss_sum: f64, correct: usize, total: usize) -> Self {
        Self {
            avg_loss: loss_sum / total as f64,
            accuracy: 100.0 * correct as f64 / total as f64,
            correct,
            total,
        }
    }
}
