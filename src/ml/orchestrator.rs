// ============================================================
// Layer 5 — Training Run
// ============================================================
// Drives a full run over 0-indexed epochs:
//
//   loop:
//     train_step      (model in training mode, lr from scheduler)
//     scheduler.advance()
//     evaluate_step   (model.valid(), may checkpoint)
//     accuracy >= target  → stop early
//     epoch + 1 == epochs → stop
//
// After the loop one extra evaluation-mode pass collects every
// misclassified sample. Keeping per-sample tensors out of the
// epoch loop means host copies are only made once, at the end.

use std::sync::Arc;

use anyhow::Result;
use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    tensor::{backend::AutodiffBackend, TensorData},
};

use crate::data::batcher::ImageBatch;
use crate::domain::{history::MetricHistory, run_config::RunConfig, traits::EpochScheduler};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::evaluator::evaluate_step;
use crate::ml::loss::predictions;
use crate::ml::model::ImageClassifier;
use crate::ml::penalty::LossPenalty;
use crate::ml::trainer::train_step;

/// One evaluation sample the final model got wrong.
#[derive(Debug, Clone)]
pub struct MisclassifiedSample {
    /// Position in the evaluation pass
    pub index:     usize,
    /// Host copy of the image, shape [channels, height, width]
    pub image:     TensorData,
    pub predicted: usize,
    pub actual:    usize,
}

/// Everything a run hands back to its caller.
#[derive(Debug)]
pub struct RunOutcome<M> {
    pub model:         M,
    pub misclassified: Vec<MisclassifiedSample>,
    pub history:       MetricHistory,
    pub stopped_early: bool,
    pub epochs_run:    usize,
}

/// Training batches live on the autodiff backend, evaluation
/// batches on its inner backend so they match `model.valid()`.
pub struct RunLoaders<B: AutodiffBackend> {
    pub train: Arc<dyn DataLoader<ImageBatch<B>>>,
    pub test:  Arc<dyn DataLoader<ImageBatch<B::InnerBackend>>>,
}

/// Run up to `cfg.epochs` epochs of train → evaluate, stopping as
/// soon as evaluation accuracy reaches `cfg.target_acc`.
///
/// `cfg` is taken as given; bounds are checked by
/// `RunConfig::validate` at the application boundary.
#[allow(clippy::too_many_arguments)]
pub fn training_run<B, M, O, S, P>(
    model:       M,
    cfg:         &RunConfig,
    device:      &B::Device,
    loaders:     &RunLoaders<B>,
    optim:       &mut O,
    scheduler:   &mut S,
    penalty:     &P,
    checkpoints: &CheckpointManager,
) -> Result<RunOutcome<M>>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + ImageClassifier<B>,
    M::InnerModule: ImageClassifier<B::InnerBackend>,
    O: Optimizer<M, B>,
    S: EpochScheduler,
    P: LossPenalty<B, M>,
{
    let mut model         = model;
    let mut history       = MetricHistory::new();
    let mut stopped_early = false;
    let mut epochs_run    = 0;

    tracing::info!(
        "Run '{}': up to {} epochs, target accuracy {:.2}%",
        cfg.label, cfg.epochs, cfg.target_acc,
    );

    for epoch in 0..cfg.epochs {
        println!("EPOCH: {}", epoch + 1);

        let lr = scheduler.learning_rate();
        let (trained, _) = train_step(
            model, device, loaders.train.as_ref(), optim, lr, penalty, &mut history,
        )?;
        model = trained;
        scheduler.advance();

        let accuracy = evaluate_step(
            &model.valid(),
            device,
            loaders.test.as_ref(),
            &mut history,
            epoch,
            cfg.target_acc,
            cfg.checkpoint.then_some(checkpoints),
        )?;
        epochs_run = epoch + 1;

        if accuracy >= cfg.target_acc {
            tracing::info!("Target accuracy reached at epoch {}", epoch + 1);
            stopped_early = true;
            break;
        }
    }

    let misclassified = collect_misclassified(&model.valid(), device, loaders.test.as_ref());
    println!(
        "Total Number of incorrectly predicted images by model type {} is {}",
        cfg.label,
        misclassified.len(),
    );

    Ok(RunOutcome { model, misclassified, history, stopped_early, epochs_run })
}

/// One pass over `loader` recording every sample whose prediction
/// differs from its label, in loader order.
pub fn collect_misclassified<B, M>(
    model:  &M,
    device: &B::Device,
    loader: &dyn DataLoader<ImageBatch<B>>,
) -> Vec<MisclassifiedSample>
where
    B: Backend,
    M: ImageClassifier<B>,
{
    let mut wrong  = Vec::new();
    let mut offset = 0usize;

    for batch in loader.iter() {
        let images  = batch.images.to_device(device);
        let targets = batch.targets.to_device(device);
        let size    = images.dims()[0];

        let predicted = to_labels(predictions(model.forward(images.clone())).into_data());
        let actual    = to_labels(targets.into_data());

        for (j, (p, a)) in predicted.into_iter().zip(actual).enumerate() {
            if p != a {
                let image = images.clone().slice([j..j + 1]).squeeze::<3>(0).into_data();
                wrong.push(MisclassifiedSample { index: offset + j, image, predicted: p, actual: a });
            }
        }
        offset += size;
    }

    wrong
}

fn to_labels(data: TensorData) -> Vec<usize> {
    data.iter::<i64>().map(|v| v as usize).collect()
}
