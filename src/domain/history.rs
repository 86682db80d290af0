// ============================================================
// Layer 3 — Metric History
// ============================================================
// Four per-epoch sequences owned by one training run:
//   train_loss, train_acc, test_loss, test_acc
//
// Loss and accuracy are always appended as a pair, so the
// two train sequences (and the two test sequences) can never
// drift out of step with each other.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricHistory {
    train_loss: Vec<f64>,
    train_acc:  Vec<f64>,
    test_loss:  Vec<f64>,
    test_acc:   Vec<f64>,
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the result of one training pass.
    pub fn record_train(&mut self, loss: f64, accuracy: f64) {
        self.train_loss.push(loss);
        self.train_acc.push(accuracy);
    }

    /// Append the result of one evaluation pass.
    pub fn record_test(&mut self, loss: f64, accuracy: f64) {
        self.test_loss.push(loss);
        self.test_acc.push(accuracy);
    }

    pub fn train_loss(&self) -> &[f64] { &self.train_loss }
    pub fn train_acc(&self)  -> &[f64] { &self.train_acc }
    pub fn test_loss(&self)  -> &[f64] { &self.test_loss }
    pub fn test_acc(&self)   -> &[f64] { &self.test_acc }

    /// Number of completed epochs (epochs with both a train and a test entry).
    pub fn epochs(&self) -> usize {
        self.train_loss.len().min(self.test_loss.len())
    }

    /// Latest evaluation accuracy, if any epoch has been evaluated.
    pub fn last_test_acc(&self) -> Option<f64> {
        self.test_acc.last().copied()
    }

    /// Highest evaluation accuracy seen so far.
    pub fn best_test_acc(&self) -> Option<f64> {
        self.test_acc.iter().copied().fold(None, |best, acc| match best {
            Some(b) if b >= acc => Some(b),
            _ => Some(acc),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_stay_in_sync() {
        let mut h = MetricHistory::new();
        h.record_train(1.2, 40.0);
        h.record_test(1.0, 45.0);
        h.record_train(0.8, 60.0);

        assert_eq!(h.train_loss().len(), h.train_acc().len());
        assert_eq!(h.test_loss().len(),  h.test_acc().len());
        // Second epoch has trained but not been evaluated yet
        assert_eq!(h.epochs(), 1);
    }

    #[test]
    fn test_best_and_last_accuracy() {
        let mut h = MetricHistory::new();
        assert_eq!(h.last_test_acc(), None);
        h.record_test(0.9, 70.0);
        h.record_test(0.7, 82.5);
        h.record_test(0.8, 80.0);
        assert_eq!(h.last_test_acc(), Some(80.0));
        assert_eq!(h.best_test_acc(), Some(82.5));
    }
}
