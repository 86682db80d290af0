use crate::domain::traits::EpochScheduler;

/// Step decay: `lr = initial_lr × gamma^(epoch / step_size)`.
///
/// Advanced once per epoch by the orchestrator, right after
/// the training pass.
#[derive(Debug, Clone)]
pub struct StepDecay {
    initial_lr: f64,
    step_size:  usize,
    gamma:      f64,
    epoch:      usize,
}

impl StepDecay {
    pub fn new(initial_lr: f64, step_size: usize, gamma: f64) -> Self {
        Self { initial_lr, step_size: step_size.max(1), gamma, epoch: 0 }
    }
}

impl EpochScheduler for StepDecay {
    fn learning_rate(&self) -> f64 {
        let decays = (self.epoch / self.step_size) as i32;
        self.initial_lr * self.gamma.powi(decays)
    }

    fn advance(&mut self) {
        self.epoch += 1;
    }
}
