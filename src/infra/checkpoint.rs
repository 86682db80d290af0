// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights plus the run config.
//
// What lives in the checkpoint directory:
//   Model_<epoch>_acc_<accuracy>.pth  — weights, written by the
//                                       evaluator when accuracy
//                                       beats the target
//   train_config.json                 — config used to rebuild
//                                       the model and data
//
// Weights are Burn records serialised with BinBytesRecorder
// (full precision) and written to the exact file name above.
// File recorders append their own extension, which would not
// survive the dot inside the accuracy part of the name.
//
// Example:
//   checkpoints/
//     Model_3_acc_86.12.pth
//     Model_4_acc_88.40.pth
//     train_config.json

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};

use crate::application::train_use_case::TrainConfig;

const CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// The directory is created on first write, so an unwritable
    /// location surfaces as an error from the save call itself.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Model_<epoch>_acc_<accuracy rounded to 2 dp>.pth`
    pub fn checkpoint_name(epoch: usize, accuracy: f64) -> String {
        format!("Model_{epoch}_acc_{accuracy:.2}.pth")
    }

    /// Persist the parameters of `model` for the given epoch.
    /// Returns the path written.
    pub fn save_model<B: Backend, M: Module<B>>(
        &self,
        model:    &M,
        epoch:    usize,
        accuracy: f64,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", self.dir.display())
        })?;

        let path  = self.dir.join(Self::checkpoint_name(epoch, accuracy));
        let bytes = BinBytesRecorder::<FullPrecisionSettings>::default()
            .record(model.clone().into_record(), ())
            .with_context(|| format!("Failed to serialise checkpoint for epoch {epoch}"))?;

        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(path)
    }

    /// Load weights from `path` into a freshly initialised `model`.
    /// The architecture must match the one that was saved.
    pub fn load_model<B: Backend, M: Module<B>>(
        &self,
        model:  M,
        path:   &Path,
        device: &B::Device,
    ) -> Result<M> {
        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;

        let record: M::Record = BinBytesRecorder::<FullPrecisionSettings>::default()
            .load(bytes, device)
            .with_context(|| {
                format!(
                    "Cannot decode checkpoint '{}'. Does it match the saved train_config.json?",
                    path.display()
                )
            })?;

        tracing::info!("Loaded checkpoint '{}'", path.display());
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON so `evaluate`
    /// can rebuild the same model and data.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", self.dir.display())
        })?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Run 'train' before 'evaluate'.",
                path.display()
            )
        })?;

        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::nn::{Linear, LinearConfig};

    type TestBackend = NdArray;

    #[test]
    fn test_checkpoint_name_rounds_to_two_places() {
        assert_eq!(CheckpointManager::checkpoint_name(3, 95.0),    "Model_3_acc_95.00.pth");
        assert_eq!(CheckpointManager::checkpoint_name(0, 86.1249), "Model_0_acc_86.12.pth");
        assert_eq!(CheckpointManager::checkpoint_name(12, 99.996), "Model_12_acc_100.00.pth");
    }

    #[test]
    fn test_save_then_load_restores_weights() {
        let tmp     = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path().join("ckpt"));
        let device  = Default::default();

        let saved: Linear<TestBackend> = LinearConfig::new(3, 2).init(&device);
        let path = manager.save_model(&saved, 1, 91.5).unwrap();
        assert!(path.ends_with("Model_1_acc_91.50.pth"));

        let fresh: Linear<TestBackend> = LinearConfig::new(3, 2).init(&device);
        let loaded = manager.load_model(fresh, &path, &device).unwrap();

        let expected: Vec<f32> = saved.weight.val().into_data().iter::<f32>().collect();
        let actual:   Vec<f32> = loaded.weight.val().into_data().iter::<f32>().collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let tmp     = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path());
        let device  = Default::default();
        let model: Linear<TestBackend> = LinearConfig::new(2, 2).init(&device);
        assert!(manager.load_model(model, &tmp.path().join("nope.pth"), &device).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let tmp     = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path());
        let mut cfg = TrainConfig::default();
        cfg.run.epochs = 7;
        manager.save_config(&cfg).unwrap();
        assert_eq!(manager.load_config().unwrap().run.epochs, 7);
    }
}
