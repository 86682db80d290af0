// ============================================================
// Layer 5 — Evaluator Step
// ============================================================
// One full pass over the evaluation loader with a model in
// evaluation mode. The caller passes `model.valid()`: the same
// weights on the inner (non-autodiff) backend, so dropout is
// off, BatchNorm uses its running statistics, and no backward
// graph can be built during the pass.
//
// Side effect: when checkpointing is enabled and the epoch's
// accuracy is strictly above the target, the weights are
// written as Model_<epoch>_acc_<accuracy>.pth.
//
// Note the orchestrator stops on accuracy >= target, while a
// checkpoint needs accuracy > target. An epoch that lands
// exactly on the target stops the run without a checkpoint.

use anyhow::{ensure, Result};
use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::ImageBatch;
use crate::domain::history::MetricHistory;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::loss::{count_correct, nll_loss_sum, scalar, PassStats};
use crate::ml::model::ImageClassifier;

/// Evaluate `model` over `loader`, append loss/accuracy to the
/// test history, and checkpoint if warranted. Returns the
/// accuracy (percent) for this epoch.
///
/// `checkpoints` is `None` when checkpointing is disabled.
pub fn evaluate_step<B, M>(
    model:       &M,
    device:      &B::Device,
    loader:      &dyn DataLoader<ImageBatch<B>>,
    history:     &mut MetricHistory,
    epoch:       usize,
    target_acc:  f64,
    checkpoints: Option<&CheckpointManager>,
) -> Result<f64>
where
    B: Backend,
    M: ImageClassifier<B>,
{
    let stats = evaluate_pass(model, device, loader)?;
    history.record_test(stats.avg_loss, stats.accuracy);

    println!(
        "Test set: Average loss: {:.4}, Accuracy: {}/{} ({:.2}%)",
        stats.avg_loss, stats.correct, stats.total, stats.accuracy,
    );

    if let Some(manager) = checkpoints {
        if stats.accuracy > target_acc {
            let path = manager.save_model(model, epoch, stats.accuracy)?;
            println!(
                "Saved model weights in file: {}",
                path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            );
        }
    }

    Ok(stats.accuracy)
}

/// Loss and accuracy over one pass, without touching any history.
pub fn evaluate_pass<B, M>(
    model:  &M,
    device: &B::Device,
    loader: &dyn DataLoader<ImageBatch<B>>,
) -> Result<PassStats>
where
    B: Backend,
    M: ImageClassifier<B>,
{
    let dataset_size = loader.num_items();
    ensure!(dataset_size > 0, "evaluation loader yielded no samples");

    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;

    for batch in loader.iter() {
        let images  = batch.images.to_device(device);
        let targets = batch.targets.to_device(device);

        let output = model.forward(images);
        loss_sum += scalar(nll_loss_sum(output.clone(), targets.clone()));
        correct  += count_correct(output, targets);
    }

    Ok(PassStats::new(loss_sum, correct, dataset_size))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::test_support::{one_hot_samples, test_loader, OneHotOracle, TestInner};

    fn files_in(dir: &std::path::Path) -> Vec<String> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_accuracy_and_history() {
        let device = Default::default();
        // 19 of 20 correct → 95%
        let loader = test_loader(one_hot_samples(4, 20, 1), 6);
        let model  = OneHotOracle::<TestInner>::new(&device);
        let mut h  = MetricHistory::new();

        let acc = evaluate_step(&model, &device, loader.as_ref(), &mut h, 0, 50.0, None).unwrap();

        assert_eq!(acc, 95.0);
        assert_eq!(h.test_acc(), &[95.0]);
        assert_eq!(h.test_loss().len(), 1);
        assert!(h.test_loss()[0] >= 0.0);
        assert!(h.train_loss().is_empty());
    }

    #[test]
    fn test_checkpoint_written_when_above_target() {
        let tmp     = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path().join("ckpt"));
        let device  = Default::default();
        let loader  = test_loader(one_hot_samples(4, 20, 1), 5);
        let model   = OneHotOracle::<TestInner>::new(&device);
        let mut h   = MetricHistory::new();

        evaluate_step(&model, &device, loader.as_ref(), &mut h, 3, 94.0, Some(&manager)).unwrap();

        assert_eq!(files_in(manager.dir()), vec!["Model_3_acc_95.00.pth".to_string()]);
    }

    #[test]
    fn test_no_checkpoint_when_equal_to_target() {
        let tmp     = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path().join("ckpt"));
        let device  = Default::default();
        let loader  = test_loader(one_hot_samples(4, 20, 1), 5);
        let model   = OneHotOracle::<TestInner>::new(&device);
        let mut h   = MetricHistory::new();

        let acc = evaluate_step(&model, &device, loader.as_ref(), &mut h, 3, 95.0, Some(&manager)).unwrap();

        assert_eq!(acc, 95.0);
        assert!(files_in(manager.dir()).is_empty());
    }

    #[test]
    fn test_no_checkpoint_when_disabled() {
        let tmp    = tempfile::tempdir().unwrap();
        let device = Default::default();
        let loader = test_loader(one_hot_samples(4, 20, 0), 5);
        let model  = OneHotOracle::<TestInner>::new(&device);
        let mut h  = MetricHistory::new();

        let acc = evaluate_step(&model, &device, loader.as_ref(), &mut h, 0, 10.0, None).unwrap();

        assert_eq!(acc, 100.0);
        assert!(files_in(tmp.path()).is_empty());
    }

    #[test]
    fn test_unwritable_checkpoint_dir_aborts() {
        let tmp     = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        // A regular file where the directory should be
        let manager = CheckpointManager::new(blocker.join("ckpt"));
        let device  = Default::default();
        let loader  = test_loader(one_hot_samples(4, 8, 0), 4);
        let model   = OneHotOracle::<TestInner>::new(&device);
        let mut h   = MetricHistory::new();

        let result = evaluate_step(&model, &device, loader.as_ref(), &mut h, 0, 50.0, Some(&manager));
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_passes_agree() {
        let device = Default::default();
        let loader = test_loader(one_hot_samples(3, 12, 2), 4);
        let model  = OneHotOracle::<TestInner>::new(&device);

        let a = evaluate_pass(&model, &device, loader.as_ref()).unwrap();
        let b = evaluate_pass(&model, &device, loader.as_ref()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.correct, 10);
    }
}
