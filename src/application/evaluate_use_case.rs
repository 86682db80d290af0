// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Re-scores a saved checkpoint:
//
//   1. Read train_config.json from the checkpoint directory
//   2. Rebuild the model and load the weights file into it
//   3. Regenerate the same test split
//   4. One evaluation pass + misclassification scan
//
// Runs on the plain (non-autodiff) backend, so the model is in
// evaluation mode by construction.

use std::path::PathBuf;

use anyhow::Result;
use burn::prelude::Backend;

use crate::application::train_use_case::TrainConfig;
use crate::data::build_loader;
use crate::domain::{history::MetricHistory, run_config::ComputeDevice};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{cpu_device, gpu_device, CpuInnerBackend, GpuInnerBackend},
    evaluator::evaluate_step,
    model::TinyCnn,
    orchestrator::collect_misclassified,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub accuracy:      f64,
    pub avg_loss:      f64,
    pub misclassified: usize,
    pub total:         usize,
}

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    weights:        PathBuf,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: impl Into<String>, weights: impl Into<PathBuf>) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), weights: weights.into() }
    }

    pub fn execute(&self) -> Result<EvaluationSummary> {
        let manager = CheckpointManager::new(&self.checkpoint_dir);
        let cfg     = manager.load_config()?;

        // A bare file name is looked up inside the checkpoint directory
        let weights = if self.weights.exists() || self.weights.is_absolute() {
            self.weights.clone()
        } else {
            manager.dir().join(&self.weights)
        };

        match cfg.run.device {
            ComputeDevice::Cpu => evaluate_on::<CpuInnerBackend>(&cfg, cpu_device(), &manager, &weights),
            ComputeDevice::Gpu => evaluate_on::<GpuInnerBackend>(&cfg, gpu_device(), &manager, &weights),
        }
    }
}

fn evaluate_on<B: Backend>(
    cfg:     &TrainConfig,
    device:  B::Device,
    manager: &CheckpointManager,
    weights: &std::path::Path,
) -> Result<EvaluationSummary> {
    let model: TinyCnn<B> = cfg.model_config().init(&device);
    let model = manager.load_model(model, weights, &device)?;

    let test   = cfg.generator().generate(cfg.test_samples, cfg.test_seed())?;
    let loader = build_loader::<B>(test, cfg.batch_size, device.clone());

    let mut history = MetricHistory::new();
    let accuracy    = evaluate_step(&model, &device, loader.as_ref(), &mut history, 0, cfg.run.target_acc, None)?;
    let wrong       = collect_misclassified(&model, &device, loader.as_ref());

    Ok(EvaluationSummary {
        accuracy,
        avg_loss:      history.test_loss().last().copied().unwrap_or_default(),
        misclassified: wrong.len(),
        total:         cfg.test_samples,
    })
}
