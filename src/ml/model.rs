use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::{log_softmax, relu},
};

/// A classifier the harness can train and evaluate.
///
/// `forward` maps images `[batch, channels, height, width]` to
/// log-probabilities `[batch, num_classes]`; the negative
/// log-likelihood loss is taken directly on that output.
pub trait ImageClassifier<B: Backend>: Module<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct TinyCnnConfig {
    pub num_classes: usize,
    #[config(default = 1)]
    pub in_channels: usize,
    #[config(default = 8)]
    pub channels:    usize,
    #[config(default = 0.1)]
    pub dropout:     f64,
}

impl TinyCnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TinyCnn<B> {
        let conv1 = Conv2dConfig::new([self.in_channels, self.channels], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv2 = Conv2dConfig::new([self.channels, self.channels * 2], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let norm1   = BatchNormConfig::new(self.channels).init(device);
        let norm2   = BatchNormConfig::new(self.channels * 2).init(device);
        let pool    = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let dropout = DropoutConfig::new(self.dropout).init();
        let head    = LinearConfig::new(self.channels * 2, self.num_classes).init(device);
        TinyCnn { conv1, norm1, conv2, norm2, pool, dropout, head }
    }
}

/// Two conv blocks, global average pooling, and a linear head.
/// BatchNorm and Dropout make train and eval mode behave
/// differently, which `valid()` switches between.
#[derive(Module, Debug)]
pub struct TinyCnn<B: Backend> {
    pub conv1:   Conv2d<B>,
    pub norm1:   BatchNorm<B, 2>,
    pub conv2:   Conv2d<B>,
    pub norm2:   BatchNorm<B, 2>,
    pub pool:    AdaptiveAvgPool2d,
    pub dropout: Dropout,
    pub head:    Linear<B>,
}

impl<B: Backend> ImageClassifier<B> for TinyCnn<B> {
    fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = relu(self.norm1.forward(self.conv1.forward(images)));
        let x = relu(self.norm2.forward(self.conv2.forward(x)));
        let x = self.pool.forward(x);            // [batch, channels, 1, 1]
        let x = x.flatten::<2>(1, 3);            // [batch, channels]
        let x = self.head.forward(self.dropout.forward(x));
        log_softmax(x, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_output_is_log_probabilities() {
        let device = Default::default();
        let model: TinyCnn<NdArray> = TinyCnnConfig::new(5).init(&device);
        let images = Tensor::<NdArray, 4>::ones([3, 1, 8, 8], &device);

        let out = model.forward(images);
        assert_eq!(out.dims(), [3, 5]);

        // exp(log p) sums to 1 per row
        let sums: Vec<f32> = out.exp().sum_dim(1).into_data().iter::<f32>().collect();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-4);
        }
    }
}
