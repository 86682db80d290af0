// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<ImageSample>
// into one image tensor and one label tensor.
//
//   Input:  N samples, each [C, H, W]
//   Output: images [N, C, H, W] (float), targets [N] (int)
//
// All samples in a batch must share the same shape.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::ImageSample;

/// A batch ready for the forward pass.
/// Both tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Pixel data, shape [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,

    /// Ground-truth class indices, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Holds the device the batch tensors are created on.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageSample, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageSample>) -> ImageBatch<B> {
        let batch_size = items.len();
        let [c, h, w]  = items[0].shape;

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i64> = items
            .iter()
            .map(|s| s.label as i64)
            .collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, c, h, w]),
            &self.device,
        );

        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]),
            &self.device,
        );

        ImageBatch { images, targets }
    }
}
