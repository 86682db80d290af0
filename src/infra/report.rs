// ============================================================
// Layer 6 — Misclassification Report
// ============================================================
// Writes the labels of every misclassified evaluation sample
// to <dir>/misclassified.json. Pixel data stays in memory with
// the caller; the report only keeps what is needed to find
// the samples again (their position in the evaluation pass).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::ml::orchestrator::MisclassifiedSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MisclassifiedEntry {
    pub index:     usize,
    pub predicted: usize,
    pub actual:    usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MisclassifiedReport {
    pub label:           String,
    pub total_evaluated: usize,
    pub entries:         Vec<MisclassifiedEntry>,
}

impl MisclassifiedReport {
    pub fn new(label: impl Into<String>, total_evaluated: usize, samples: &[MisclassifiedSample]) -> Self {
        let entries = samples
            .iter()
            .map(|s| MisclassifiedEntry {
                index:     s.index,
                predicted: s.predicted,
                actual:    s.actual,
            })
            .collect();
        Self { label: label.into(), total_evaluated, entries }
    }

    /// Count of (actual, predicted) confusions, most frequent first.
    pub fn top_confusions(&self, limit: usize) -> Vec<((usize, usize), usize)> {
        let mut counts = std::collections::BTreeMap::new();
        for e in &self.entries {
            *counts.entry((e.actual, e.predicted)).or_insert(0usize) += 1;
        }
        let mut pairs: Vec<_> = counts.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        pairs.truncate(limit);
        pairs
    }
}

/// Write `report` as pretty JSON into `dir`; returns the file path.
pub fn write_misclassified(dir: impl AsRef<Path>, report: &MisclassifiedReport) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create report directory '{}'", dir.display()))?;

    let path = dir.join("misclassified.json");
    fs::write(&path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;

    tracing::debug!("Wrote {} misclassified entries to '{}'", report.entries.len(), path.display());
    Ok(path)
}
