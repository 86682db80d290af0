// ============================================================
// Layer 5 — Loss Penalties
// ============================================================
// Optional terms added to the data loss before the backward
// pass. The trainer asks the penalty for an extra term and
// adds it when one is returned, so swapping regularisers
// never touches the loop itself.
//
//   NoPenalty       → never adds anything
//   L1Penalty(λ)    → λ · Σ|θ| over every trainable parameter,
//                     nothing at all when λ == 0

use burn::{
    module::{ModuleVisitor, ParamId},
    prelude::*,
};

pub trait LossPenalty<B: Backend, M: Module<B>> {
    /// Extra loss term for the current parameters, or `None`
    /// when the penalty contributes nothing.
    fn penalty(&self, model: &M) -> Option<Tensor<B, 1>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoPenalty;

impl<B: Backend, M: Module<B>> LossPenalty<B, M> for NoPenalty {
    fn penalty(&self, _model: &M) -> Option<Tensor<B, 1>> {
        None
    }
}

/// Sparsity regulariser: `lambda × Σ|θ|`.
#[derive(Debug, Clone, Copy)]
pub struct L1Penalty {
    lambda: f64,
}

impl L1Penalty {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

impl<B: Backend, M: Module<B>> LossPenalty<B, M> for L1Penalty {
    fn penalty(&self, model: &M) -> Option<Tensor<B, 1>> {
        if self.lambda <= 0.0 {
            return None;
        }
        let mut visitor = AbsSum::<B> { total: None };
        model.visit(&mut visitor);
        visitor.total.map(|sum| sum.mul_scalar(self.lambda))
    }
}

/// Sums |θ| over every tensor that takes part in gradient
/// computation. Running statistics (e.g. BatchNorm means) are
/// module state but not trainable, so they are skipped.
struct AbsSum<B: Backend> {
    total: Option<Tensor<B, 1>>,
}

impl<B: Backend> ModuleVisitor<B> for AbsSum<B> {
    fn visit_float<const D: usize>(&mut self, _id: ParamId, tensor: &Tensor<B, D>) {
        if !tensor.is_require_grad() {
            return;
        }
        let part = tensor.clone().abs().sum();
        self.total = Some(match self.total.take() {
            Some(acc) => acc + part,
            None => part,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::loss::scalar;
    use burn::backend::{Autodiff, NdArray};
    use burn::nn::{Linear, LinearConfig};

    type TestBackend = Autodiff<NdArray>;

    fn abs_sum(linear: &Linear<TestBackend>) -> f64 {
        let w = scalar(linear.weight.val().abs().sum());
        let b = linear.bias.as_ref().map(|b| scalar(b.val().abs().sum())).unwrap_or(0.0);
        w + b
    }

    #[test]
    fn test_zero_lambda_adds_nothing() {
        let device = Default::default();
        let model: Linear<TestBackend> = LinearConfig::new(4, 3).init(&device);
        let l1:   Option<Tensor<TestBackend, 1>> = L1Penalty::new(0.0).penalty(&model);
        let none: Option<Tensor<TestBackend, 1>> = NoPenalty.penalty(&model);
        assert!(l1.is_none());
        assert!(none.is_none());
    }

    #[test]
    fn test_l1_is_lambda_times_abs_sum() {
        let device = Default::default();
        let model: Linear<TestBackend> = LinearConfig::new(4, 3).init(&device);

        let term: Option<Tensor<TestBackend, 1>> = L1Penalty::new(0.5).penalty(&model);
        let got  = scalar(term.expect("penalty term"));
        let want = 0.5 * abs_sum(&model);
        assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
    }

    #[test]
    fn test_l1_has_gradient_on_weights() {
        let device = Default::default();
        let model: Linear<TestBackend> = LinearConfig::new(2, 2).init(&device);

        let term: Option<Tensor<TestBackend, 1>> = L1Penalty::new(1.0).penalty(&model);
        let grads = term.expect("penalty term").backward();
        // d|w|/dw = sign(w), so every weight gradient has magnitude 1
        let g = model.weight.val().grad(&grads).expect("weight gradient");
        for v in g.into_data().iter::<f32>() {
            assert!((v.abs() - 1.0).abs() < 1e-6 || v == 0.0);
        }
    }
}
