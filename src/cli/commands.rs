// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// Every flag of a training run.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for bad values
//   - type conversion (string → usize, f64, LrSchedule, etc.)
//
// Flags keep their underscore spelling (--data_dir, --batch_size).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, ValueEnum};

use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::ml::scheduler::LrSchedule;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendArg {
    Wgpu,
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::Ndarray,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Dataset root: train.csv (img_path,label) or train/<class>/ folders
    #[arg(long = "data_dir", default_value = "data/")]
    pub data_dir: String,

    /// Registered model name (BaseModel, SmallCnn, WideCnn)
    #[arg(long, default_value = "BaseModel")]
    pub model: String,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 3e-4)]
    pub lr: f64,

    #[arg(long = "batch_size", default_value_t = 64)]
    pub batch_size: usize,

    /// Seeds model init, dropout, the split and loader shuffling
    #[arg(long, default_value_t = 41)]
    pub seed: u64,

    /// Run name; an existing run directory gets a numeric suffix
    #[arg(long, default_value = "exp")]
    pub name: String,

    /// Images are resized to img_size x img_size
    #[arg(long = "img_size", default_value_t = 128)]
    pub img_size: u32,

    /// Width of the classifier head
    #[arg(long = "num_classes", default_value_t = 50)]
    pub num_classes: usize,

    /// Fraction of each class held out for validation
    #[arg(long = "val_ratio", default_value_t = 0.2)]
    pub val_ratio: f64,

    #[arg(long = "output_dir", default_value = "./output/model")]
    pub output_dir: String,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,

    /// Validation loader threads (default: half the logical CPUs); training batches load on one thread
    #[arg(long = "num_workers")]
    pub num_workers: Option<usize>,

    /// none | step:<step_size>:<gamma> | cosine:<t_max>
    #[arg(long, default_value = "none")]
    pub scheduler: LrSchedule,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:    a.data_dir,
            model:       a.model,
            epochs:      a.epochs,
            lr:          a.lr,
            batch_size:  a.batch_size,
            seed:        a.seed,
            name:        a.name,
            img_size:    a.img_size,
            num_classes: a.num_classes,
            val_ratio:   a.val_ratio,
            output_dir:  a.output_dir,
            backend:     a.backend.into(),
            num_workers: a.num_workers,
            scheduler:   a.scheduler,
        }
    }
}
