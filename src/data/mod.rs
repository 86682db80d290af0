// ============================================================
// Layer 4 — Data
// ============================================================
// Everything between raw labelled images and device-ready
// tensor batches:
//
//   SyntheticShapes  → seeded labelled images (demo source)
//       │
//       ▼
//   ImageDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher     → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader       → feeds batches to trainer / evaluator
//
// The harness only consumes the DataLoader end; loading and
// augmentation pipelines are out of scope.

/// Implements Burn's Dataset trait for labelled images
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded synthetic image generator
pub mod synthetic;

use std::sync::Arc;

use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use batcher::{ImageBatch, ImageBatcher};
use dataset::{ImageDataset, ImageSample};

/// Build an in-order data loader over `samples`.
///
/// No shuffling, so every pass yields the same batches in the
/// same order; the misclassification indices rely on that.
pub fn build_loader<B: Backend>(
    samples:    Vec<ImageSample>,
    batch_size: usize,
    device:     B::Device,
) -> Arc<dyn DataLoader<ImageBatch<B>>> {
    DataLoaderBuilder::new(ImageBatcher::<B>::new(device))
        .batch_size(batch_size.max(1))
        .build(ImageDataset::new(samples))
}

/// Build a shuffling data loader over `samples` for training passes.
pub fn build_shuffled_loader<B: Backend>(
    samples:    Vec<ImageSample>,
    batch_size: usize,
    seed:       u64,
    device:     B::Device,
) -> Arc<dyn DataLoader<ImageBatch<B>>> {
    DataLoaderBuilder::new(ImageBatcher::<B>::new(device))
        .batch_size(batch_size.max(1))
        .shuffle(seed)
        .build(ImageDataset::new(samples))
}
