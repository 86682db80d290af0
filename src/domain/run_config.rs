// ============================================================
// Layer 3 — RunConfig
// ============================================================
// The immutable configuration for one training run.
//
// Invariants (checked by `validate`):
//   - epochs > 0
//   - target_acc in (0, 100]
//   - lr and lambda_l1 finite and >= 0
//   - momentum in [0, 1), lr_gamma finite and > 0
//
// `validate` is called at the application boundary. The
// orchestrator itself takes the config as given, so a caller
// can deliberately pass an unreachable target (e.g. 999) to
// force every epoch to run.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Where tensors are placed for a run.
///
/// Resolved once to a concrete Burn backend by the application
/// layer and then threaded through every call as a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// Host CPU (NdArray backend)
    Cpu,
    /// Default GPU adapter (WGPU backend)
    Gpu,
}

impl std::fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputeDevice::Cpu => write!(f, "cpu"),
            ComputeDevice::Gpu => write!(f, "gpu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of epochs (train pass + eval pass)
    pub epochs: usize,

    /// Initial learning rate handed to the scheduler
    pub lr: f64,

    /// SGD momentum coefficient
    pub momentum: f64,

    /// L1 penalty coefficient; 0 disables the penalty
    pub lambda_l1: f64,

    /// Evaluation accuracy (percent) that stops the run early
    pub target_acc: f64,

    /// Decay the learning rate every this many epochs
    pub lr_step_size: usize,

    /// Multiplicative decay factor applied every `lr_step_size` epochs
    pub lr_gamma: f64,

    pub device: ComputeDevice,

    /// Persist weights whenever accuracy strictly exceeds the target
    pub checkpoint: bool,

    /// Directory receiving checkpoints and run artefacts
    pub checkpoint_dir: String,

    /// Free-text name used in the final misclassification report
    pub label: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs:         20,
            lr:             0.001,
            momentum:       0.9,
            lambda_l1:      0.0,
            target_acc:     85.0,
            lr_step_size:   100,
            lr_gamma:       0.25,
            device:         ComputeDevice::Cpu,
            checkpoint:     false,
            checkpoint_dir: "checkpoints".to_string(),
            label:          "BN".to_string(),
        }
    }
}

impl RunConfig {
    /// Reject configurations that break the run invariants.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            bail!("epochs must be greater than 0");
        }
        if !(self.target_acc > 0.0 && self.target_acc <= 100.0) {
            bail!("target accuracy must be in (0, 100], got {}", self.target_acc);
        }
        if !(self.lr.is_finite() && self.lr >= 0.0) {
            bail!("learning rate must be a finite non-negative number, got {}", self.lr);
        }
        if !(self.lambda_l1.is_finite() && self.lambda_l1 >= 0.0) {
            bail!("lambda_l1 must be a finite non-negative number, got {}", self.lambda_l1);
        }
        if !(0.0..1.0).contains(&self.momentum) {
            bail!("momentum must be in [0, 1), got {}", self.momentum);
        }
        if self.lr_step_size == 0 {
            bail!("lr_step_size must be greater than 0");
        }
        if !(self.lr_gamma.is_finite() && self.lr_gamma > 0.0) {
            bail!("lr_gamma must be a finite positive number, got {}", self.lr_gamma);
        }
        Ok(())
    }
}
