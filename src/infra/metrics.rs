// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records per-epoch metrics of a run to a CSV file.
//
// Metrics recorded per epoch:
//   - epoch:      0-based epoch index
//   - train_loss: summed NLL / training-set size
//   - train_acc:  % of training samples predicted correctly
//   - test_loss:  summed NLL / evaluation-set size
//   - test_acc:   % of evaluation samples predicted correctly
//
// Output file: <checkpoint_dir>/metrics.csv, replaced at the
// start of every run like the other run artefacts.
//
// Example CSV output:
//   epoch,train_loss,train_acc,test_loss,test_acc
//   0,1.843200,41.250000,1.402100,58.900000
//   1,0.921400,77.800000,0.633000,83.100000

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::history::MetricHistory;

/// One row of metrics for a single epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub test_loss:  f64,
    pub test_acc:   f64,
}

impl EpochMetrics {
    /// One row per epoch that has both a train and a test entry.
    pub fn from_history(history: &MetricHistory) -> Vec<Self> {
        (0..history.epochs())
            .map(|epoch| Self {
                epoch,
                train_loss: history.train_loss()[epoch],
                train_acc:  history.train_acc()[epoch],
                test_loss:  history.test_loss()[epoch],
                test_acc:   history.test_acc()[epoch],
            })
            .collect()
    }

    /// True if this epoch's evaluation accuracy beats `best_acc`.
    pub fn is_improvement(&self, best_acc: f64) -> bool {
        self.test_acc > best_acc
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Starts a fresh metrics.csv holding only the header. Rows
    /// from an earlier run in the same directory are discarded.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create metrics file '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,train_acc,test_loss,test_acc")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch as a new CSV row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.test_loss,
            m.test_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_acc={:.2}",
            m.epoch,
            m.train_loss,
            m.test_acc,
        );

        Ok(())
    }

    /// Append every completed epoch of `history`.
    pub fn log_history(&self, history: &MetricHistory) -> Result<()> {
        let mut best = f64::NEG_INFINITY;
        for row in EpochMetrics::from_history(history) {
            if row.is_improvement(best) {
                tracing::debug!("Epoch {} new best test accuracy {:.2}%", row.epoch, row.test_acc);
                best = row.test_acc;
            }
            self.log(&row)?;
        }
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn two_epoch_history() -> MetricHistory {
        let mut h = MetricHistory::new();
        h.record_train(1.5, 40.0);
        h.record_test(1.2, 55.0);
        h.record_train(0.9, 70.0);
        h.record_test(0.8, 75.0);
        h
    }

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::from_history(&two_epoch_history()).remove(1);
        assert!(m.is_improvement(70.0));
        assert!(!m.is_improvement(75.0));
    }

    #[test]
    fn test_rows_follow_history() {
        let rows = EpochMetrics::from_history(&two_epoch_history());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].epoch, 0);
        assert_eq!(rows[1].test_loss, 0.8);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let tmp    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.log_history(&two_epoch_history()).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,train_acc,test_loss,test_acc");
        assert_eq!(lines[1], "0,1.500000,40.000000,1.200000,55.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_second_run_replaces_previous_rows() {
        let tmp = tempfile::tempdir().unwrap();
        MetricsLogger::new(tmp.path()).unwrap().log_history(&two_epoch_history()).unwrap();

        let mut second = MetricHistory::new();
        second.record_train(2.0, 10.0);
        second.record_test(2.5, 20.0);
        MetricsLogger::new(tmp.path()).unwrap().log_history(&second).unwrap();

        let text  = fs::read_to_string(tmp.path().join("metrics.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(text.matches("epoch,").count(), 1);
        assert_eq!(lines[1], "0,2.000000,10.000000,2.500000,20.000000");
    }
}
