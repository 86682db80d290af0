// Shared fixtures for the ml unit tests.
//
// OneHotOracle is a one-parameter classifier whose predictions
// are fixed by the input: each image is [1, 1, C] with a single
// lit pixel, and the oracle predicts that pixel's class. Labels
// are generated so a chosen number of samples disagree with the
// lit pixel, which pins accuracy to an exact value.
//
// SkillRamp gets better by a fixed amount every epoch. Each image
// is a single pixel holding a difficulty d, every label is 0, and
// the model answers class 0 iff its skill exceeds d. Its output is
// an unnormalised score, so the summed NLL is linear in the skill
// and plain SGD raises it by exactly `lr × batch size` per step.

use std::sync::Arc;

use burn::{
    backend::{Autodiff, NdArray},
    data::dataloader::DataLoader,
    module::{AutodiffModule, Param},
    optim::{adaptor::OptimizerAdaptor, momentum::MomentumConfig, Sgd, SgdConfig},
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::data::{batcher::ImageBatch, build_loader, dataset::ImageSample, synthetic::SyntheticShapes};
use crate::ml::model::ImageClassifier;

pub type TestBackend = Autodiff<NdArray>;
pub type TestInner   = NdArray;

#[derive(Module, Debug)]
pub struct OneHotOracle<B: Backend> {
    pub scale: Param<Tensor<B, 1>>,
}

impl<B: Backend> OneHotOracle<B> {
    pub fn new(device: &B::Device) -> Self {
        Self { scale: Param::from_tensor(Tensor::from_floats([10.0f32], device)) }
    }

    pub fn scale_value(&self) -> f32 {
        self.scale.val().into_scalar().elem::<f32>()
    }
}

impl<B: Backend> ImageClassifier<B> for OneHotOracle<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = images.flatten::<2>(1, 3);   // [batch, C]
        let scale  = self.scale.val().unsqueeze::<2>();
        log_softmax(logits * scale, 1)
    }
}

#[derive(Module, Debug)]
pub struct SkillRamp<B: Backend> {
    pub skill: Param<Tensor<B, 1>>,
}

impl<B: Backend> SkillRamp<B> {
    pub fn new(device: &B::Device) -> Self {
        Self { skill: Param::from_tensor(Tensor::from_floats([0.0f32], device)) }
    }
}

impl<B: Backend> ImageClassifier<B> for SkillRamp<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let [batch, ..] = images.dims();
        let device      = images.device();
        let difficulty  = images.flatten::<2>(1, 3);                  // [batch, 1]
        let margin      = self.skill.val().unsqueeze::<2>() - difficulty;
        Tensor::cat(vec![margin, Tensor::zeros([batch, 1], &device)], 1)
    }
}

/// Label-0 images carrying one difficulty value each.
pub fn difficulty_samples(difficulties: &[f32]) -> Vec<ImageSample> {
    difficulties
        .iter()
        .map(|&d| ImageSample::new(vec![d], [1, 1, 1], 0))
        .collect()
}

/// `count` one-hot images over `num_classes` classes. Sample `i`
/// lights pixel `i % num_classes`; the first `mislabeled` samples
/// carry the next class as their label instead.
pub fn one_hot_samples(num_classes: usize, count: usize, mislabeled: usize) -> Vec<ImageSample> {
    (0..count)
        .map(|i| {
            let class = i % num_classes;
            let mut pixels = vec![0.0f32; num_classes];
            pixels[class] = 1.0;
            let label = if i < mislabeled { (class + 1) % num_classes } else { class };
            ImageSample::new(pixels, [1, 1, num_classes], label)
        })
        .collect()
}

/// 8×8 four-class synthetic images, small enough for TinyCnn on CPU.
pub fn shapes_samples(count: usize, seed: u64) -> Vec<ImageSample> {
    SyntheticShapes::new(8, 4, 0.1, 0.0)
        .generate(count, seed)
        .expect("synthetic samples")
}

pub fn train_loader(samples: Vec<ImageSample>, batch: usize) -> Arc<dyn DataLoader<ImageBatch<TestBackend>>> {
    build_loader::<TestBackend>(samples, batch, Default::default())
}

pub fn test_loader(samples: Vec<ImageSample>, batch: usize) -> Arc<dyn DataLoader<ImageBatch<TestInner>>> {
    build_loader::<TestInner>(samples, batch, Default::default())
}

/// SGD with momentum 0.9, the harness default.
pub fn sgd<M: AutodiffModule<TestBackend>>() -> OptimizerAdaptor<Sgd<TestInner>, M, TestBackend> {
    SgdConfig::new()
        .with_momentum(Some(MomentumConfig::new().with_momentum(0.9).with_dampening(0.0)))
        .init::<TestBackend, M>()
}
