// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `evaluate`, and all
// their flags. Defaults mirror `RunConfig::default()` and
// `TrainConfig::default()`.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::domain::run_config::{ComputeDevice, RunConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the demo classifier on synthetic images
    Train(TrainArgs),

    /// Re-score a saved checkpoint on the test split
    Evaluate(EvaluateArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceArg {
    Cpu,
    Gpu,
}

impl From<DeviceArg> for ComputeDevice {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu => ComputeDevice::Cpu,
            DeviceArg::Gpu => ComputeDevice::Gpu,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Maximum number of epochs
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Initial learning rate
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// SGD momentum
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    /// L1 penalty coefficient (0 disables it)
    #[arg(long, default_value_t = 0.0)]
    pub lambda_l1: f64,

    /// Stop once test accuracy (percent) reaches this value
    #[arg(long, default_value_t = 85.0)]
    pub target_acc: f64,

    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,

    /// Save weights whenever test accuracy exceeds the target
    #[arg(long)]
    pub checkpoint: bool,

    /// Directory for checkpoints, config, metrics and report
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Decay the learning rate every N epochs
    #[arg(long, default_value_t = 100)]
    pub lr_step_size: usize,

    /// Learning-rate decay factor
    #[arg(long, default_value_t = 0.25)]
    pub lr_gamma: f64,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 2000)]
    pub train_samples: usize,

    #[arg(long, default_value_t = 500)]
    pub test_samples: usize,

    /// Side length of the square synthetic images
    #[arg(long, default_value_t = 16)]
    pub image_size: usize,

    #[arg(long, default_value_t = 4)]
    pub num_classes: usize,

    /// Background noise amplitude
    #[arg(long, default_value_t = 0.3)]
    pub noise: f32,

    /// Fraction of training and test labels replaced at random
    #[arg(long, default_value_t = 0.0)]
    pub label_noise: f64,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Name printed with the final misclassification count
    #[arg(long, default_value = "BN")]
    pub label: String,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            run: RunConfig {
                epochs:         a.epochs,
                lr:             a.lr,
                momentum:       a.momentum,
                lambda_l1:      a.lambda_l1,
                target_acc:     a.target_acc,
                lr_step_size:   a.lr_step_size,
                lr_gamma:       a.lr_gamma,
                device:         a.device.into(),
                checkpoint:     a.checkpoint,
                checkpoint_dir: a.checkpoint_dir,
                label:          a.label,
            },
            batch_size:    a.batch_size,
            train_samples: a.train_samples,
            test_samples:  a.test_samples,
            image_size:    a.image_size,
            num_classes:   a.num_classes,
            noise:         a.noise,
            label_noise:   a.label_noise,
            dropout:       a.dropout,
            seed:          a.seed,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Checkpoint file (.pth) to load; a bare name is looked up in --checkpoint-dir
    #[arg(long)]
    pub weights: String,

    /// Directory holding train_config.json from the training run
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
