use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One labelled image, stored channel-major: `pixels.len() == c * h * w`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSample {
    pub pixels: Vec<f32>,
    /// `[channels, height, width]`
    pub shape:  [usize; 3],
    pub label:  usize,
}

impl ImageSample {
    pub fn new(pixels: Vec<f32>, shape: [usize; 3], label: usize) -> Self {
        debug_assert_eq!(pixels.len(), shape.iter().product::<usize>());
        Self { pixels, shape, label }
    }
}

pub struct ImageDataset {
    samples: Vec<ImageSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<ImageSample>) -> Self { Self { samples } }

}

/// Number of samples per label, indexed by label. Labels at or
/// above `num_classes` are not counted.
pub fn label_counts(samples: &[ImageSample], num_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_classes];
    for s in samples {
        if let Some(c) = counts.get_mut(s.label) {
            *c += 1;
        }
    }
    counts
}

impl Dataset<ImageSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
