// ============================================================
// Layer 5 — Trainer Step
// ============================================================
// One full pass over the training loader:
//
//   for each batch:
//     move images / targets to the device
//     forward → log-probabilities
//     loss = Σ NLL (+ optional penalty term)
//     backward → fresh gradients for this batch only
//     optimiser step → updated model
//
// Burn's gradients are created by `loss.backward()` and
// consumed by `optim.step`, so nothing carries over between
// batches and there is no separate zero-grad call.
//
// After the pass the summed loss and correct count are
// normalised by the dataset size and appended to the
// training history.

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::ImageBatch;
use crate::domain::history::MetricHistory;
use crate::ml::loss::{count_correct, nll_loss_sum, scalar, PassStats};
use crate::ml::model::ImageClassifier;
use crate::ml::penalty::LossPenalty;

/// Train `model` for one pass over `loader` at learning rate `lr`.
/// Returns the updated model together with the pass totals.
pub fn train_step<B, M, O, P>(
    model:   M,
    device:  &B::Device,
    loader:  &dyn DataLoader<ImageBatch<B>>,
    optim:   &mut O,
    lr:      f64,
    penalty: &P,
    history: &mut MetricHistory,
) -> Result<(M, PassStats)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + ImageClassifier<B>,
    O: Optimizer<M, B>,
    P: LossPenalty<B, M>,
{
    let dataset_size = loader.num_items();
    ensure!(dataset_size > 0, "training loader yielded no samples");

    let mut model    = model;
    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;

    for batch in loader.iter() {
        let images  = batch.images.to_device(device);
        let targets = batch.targets.to_device(device);

        let output   = model.forward(images);
        let mut loss = nll_loss_sum(output.clone(), targets.clone());
        if let Some(extra) = penalty.penalty(&model) {
            loss = loss + extra;
        }

        loss_sum += scalar(loss.clone());
        correct  += count_correct(output, targets);

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(lr, model, grads);
    }

    let stats = PassStats::new(loss_sum, correct, dataset_size);
    history.record_train(stats.avg_loss, stats.accuracy);

    println!(
        "Average Training Loss={:.4}, Accuracy={:.2}",
        stats.avg_loss, stats.accuracy,
    );

    Ok((model, stats))
}
