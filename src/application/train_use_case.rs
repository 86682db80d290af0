// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Validate the configuration       (Layer 3 - domain)
//   Step 2: Save config for `evaluate`       (Layer 6 - infra)
//   Step 3: Resolve the compute device       (Layer 5 - ml)
//   Step 4: Generate train / test samples    (Layer 4 - data)
//   Step 5: Build loaders                    (Layer 4 - data)
//   Step 6: Build model, optimiser, schedule (Layer 5 - ml)
//   Step 7: Run the epoch loop               (Layer 5 - ml)
//   Step 8: Write metrics and the report     (Layer 6 - infra)

use anyhow::{ensure, Result};
use burn::{
    module::Module,
    optim::{momentum::MomentumConfig, SgdConfig},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{build_loader, build_shuffled_loader, dataset::label_counts, synthetic::SyntheticShapes};
use crate::domain::run_config::{ComputeDevice, RunConfig};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    report::{write_misclassified, MisclassifiedReport},
};
use crate::ml::{
    backend::{cpu_device, gpu_device, CpuBackend, GpuBackend},
    model::{TinyCnn, TinyCnnConfig},
    orchestrator::{training_run, RunLoaders},
    penalty::L1Penalty,
    schedule::StepDecay,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// The core run settings plus everything needed to rebuild the
// same data and model. Saved as train_config.json next to the
// checkpoints so `evaluate` can reconstruct both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub run:           RunConfig,
    pub batch_size:    usize,
    pub train_samples: usize,
    pub test_samples:  usize,
    pub image_size:    usize,
    pub num_classes:   usize,
    pub noise:         f32,
    pub label_noise:   f64,
    pub dropout:       f64,
    pub seed:          u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            run:           RunConfig::default(),
            batch_size:    64,
            train_samples: 2_000,
            test_samples:  500,
            image_size:    16,
            num_classes:   4,
            noise:         0.3,
            label_noise:   0.0,
            dropout:       0.1,
            seed:          42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        self.run.validate()?;
        ensure!(self.batch_size > 0, "batch size must be greater than 0");
        ensure!(self.train_samples > 0, "need at least one training sample");
        ensure!(self.test_samples > 0, "need at least one test sample");
        ensure!(
            (0.0..1.0).contains(&self.dropout),
            "dropout must be in [0, 1), got {}",
            self.dropout
        );
        Ok(())
    }

    pub fn generator(&self) -> SyntheticShapes {
        SyntheticShapes::new(self.image_size, self.num_classes, self.noise, self.label_noise)
    }

    pub fn model_config(&self) -> TinyCnnConfig {
        TinyCnnConfig::new(self.num_classes).with_dropout(self.dropout)
    }

    /// The test split uses its own seed so it never repeats
    /// the training images.
    pub fn test_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }
}

/// What a finished training run reports back to the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub epochs_run:      usize,
    pub stopped_early:   bool,
    pub final_test_acc:  Option<f64>,
    pub best_test_acc:   Option<f64>,
    pub misclassified:   usize,
    pub total_evaluated: usize,
    /// Most frequent (actual, predicted) pairs among the misclassified
    pub top_confusions:  Vec<((usize, usize), usize)>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Save config for evaluation ────────────────────────────────
        let manager = CheckpointManager::new(&cfg.run.checkpoint_dir);
        manager.save_config(cfg)?;

        // ── Step 3: Resolve device, then run on the matching backend ─────────
        tracing::info!("Training on {} device", cfg.run.device);
        match cfg.run.device {
            ComputeDevice::Cpu => run_on::<CpuBackend>(cfg, cpu_device(), &manager),
            ComputeDevice::Gpu => run_on::<GpuBackend>(cfg, gpu_device(), &manager),
        }
    }
}

fn run_on<B: AutodiffBackend>(
    cfg:     &TrainConfig,
    device:  B::Device,
    manager: &CheckpointManager,
) -> Result<TrainSummary> {
    // ── Step 4: Generate samples ──────────────────────────────────────────────
    let generator = cfg.generator();
    let train     = generator.generate(cfg.train_samples, cfg.seed)?;
    let test      = generator.generate(cfg.test_samples, cfg.test_seed())?;
    tracing::info!("Generated {} train / {} test samples", train.len(), test.len());
    tracing::debug!("Train label counts: {:?}", label_counts(&train, cfg.num_classes));

    // ── Step 5: Loaders ───────────────────────────────────────────────────────
    // Training batches on the autodiff backend, evaluation on its inner one
    let loaders = RunLoaders::<B> {
        train: build_shuffled_loader::<B>(train, cfg.batch_size, cfg.seed, device.clone()),
        test:  build_loader::<B::InnerBackend>(test, cfg.batch_size, device.clone()),
    };

    // ── Step 6: Model, optimiser, schedule ────────────────────────────────────
    let model: TinyCnn<B> = cfg.model_config().init(&device);
    let mut optim = SgdConfig::new()
        .with_momentum(Some(
            MomentumConfig::new()
                .with_momentum(cfg.run.momentum)
                .with_dampening(0.0),
        ))
        .init::<B, TinyCnn<B>>();
    let mut scheduler = StepDecay::new(cfg.run.lr, cfg.run.lr_step_size, cfg.run.lr_gamma);
    let penalty       = L1Penalty::new(cfg.run.lambda_l1);

    // ── Step 7: Epoch loop ────────────────────────────────────────────────────
    let outcome = training_run(
        model, &cfg.run, &device, &loaders, &mut optim, &mut scheduler, &penalty, manager,
    )?;
    tracing::info!("Trained model: {} parameters", outcome.model.num_params());

    // ── Step 8: Artefacts ─────────────────────────────────────────────────────
    let logger = MetricsLogger::new(manager.dir())?;
    logger.log_history(&outcome.history)?;
    tracing::info!("Metrics written to '{}'", logger.csv_path().display());

    let report = MisclassifiedReport::new(&cfg.run.label, cfg.test_samples, &outcome.misclassified);
    let path   = write_misclassified(manager.dir(), &report)?;
    tracing::info!("Misclassification report written to '{}'", path.display());

    Ok(TrainSummary {
        epochs_run:      outcome.epochs_run,
        stopped_early:   outcome.stopped_early,
        final_test_acc:  outcome.history.last_test_acc(),
        best_test_acc:   outcome.history.best_test_acc(),
        misclassified:   outcome.misclassified.len(),
        total_evaluated: cfg.test_samples,
        top_confusions:  report.top_confusions(3),
    })
}
