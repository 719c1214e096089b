// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Pick the next free run directory   (Layer 6 - infra)
//   Step 2: Seed backend + host RNGs           (Layer 6 - infra)
//   Step 3: Load, split and decode the images  (Layer 4 - data)
//   Step 4: Save config + class index          (Layer 6 - infra)
//   Step 5: Resolve the model by name          (Layer 5 - ml)
//   Step 6: Build Adam + the data loaders      (Layer 4/5)
//   Step 7: Run the epoch loop                 (Layer 5 - ml)
//   Step 8: Rebuild the best model from disk   (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::{
    backend::{
        ndarray::NdArrayDevice,
        wgpu::WgpuDevice,
        Autodiff, NdArray, Wgpu,
    },
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::Module,
    optim::AdamConfig,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

use crate::data::{
    batcher::{ImageBatch, ImageBatcher},
    dataset::get_dataset,
};
use crate::infra::{checkpoint::CheckpointManager, paths::create_run_dir, seed::seed_everything};
use crate::ml::{
    registry::ModelRegistry,
    scheduler::LrSchedule,
    trainer::{train, TrainSummary},
};

// ─── Backend Selection ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// GPU through wgpu (Vulkan / Metal / DX12), falls back to the adapter wgpu picks
    #[default]
    Wgpu,
    /// Pure-Rust CPU backend
    Ndarray,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a run. Saved as train_config.json next to the
// checkpoints so a run can be reproduced later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:    String,
    pub model:       String,
    pub epochs:      usize,
    pub lr:          f64,
    pub batch_size:  usize,
    pub seed:        u64,
    pub name:        String,
    pub img_size:    u32,
    pub num_classes: usize,
    pub val_ratio:   f64,
    pub output_dir:  String,
    pub backend:     BackendKind,
    /// Validation loader threads. None → half the logical CPUs.
    pub num_workers: Option<usize>,
    pub scheduler:   LrSchedule,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:    "data/".to_string(),
            model:       "BaseModel".to_string(),
            epochs:      20,
            lr:          3e-4,
            batch_size:  64,
            seed:        41,
            name:        "exp".to_string(),
            img_size:    128,
            num_classes: 50,
            val_ratio:   0.2,
            output_dir:  "./output/model".to_string(),
            backend:     BackendKind::Wgpu,
            num_workers: None,
            scheduler:   LrSchedule::None,
        }
    }
}

impl TrainConfig {
    pub fn workers(&self) -> usize {
        self.num_workers
            .unwrap_or_else(|| num_cpus::get() / 2)
            .max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            bail!("--epochs must be at least 1");
        }
        if self.batch_size == 0 {
            bail!("--batch_size must be at least 1");
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            bail!("--lr must be a positive number, got {}", self.lr);
        }
        if !(0.0..1.0).contains(&self.val_ratio) {
            bail!("--val_ratio must be in [0, 1), got {}", self.val_ratio);
        }
        if self.num_classes == 0 {
            bail!("--num_classes must be at least 1");
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run on the configured backend.
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        match cfg.backend {
            BackendKind::Wgpu => {
                let device = WgpuDevice::default();
                tracing::info!("Using WGPU device: {:?}", device);
                run::<Autodiff<Wgpu>>(cfg, device)
            }
            BackendKind::Ndarray => {
                let device = NdArrayDevice::Cpu;
                tracing::info!("Using NdArray device: {:?}", device);
                run::<Autodiff<NdArray>>(cfg, device)
            }
        }
    }
}

/// The whole pipeline for one autodiff backend.
pub fn run<B: AutodiffBackend>(cfg: &TrainConfig, device: B::Device) -> Result<TrainSummary> {
    // ── Step 1: Run directory ─────────────────────────────────────────────────
    let saved_dir = create_run_dir(Path::new(&cfg.output_dir), &cfg.name)?;
    tracing::info!("Run directory: '{}'", saved_dir.display());

    // ── Step 2: Seeding ───────────────────────────────────────────────────────
    let mut rng = seed_everything::<B>(&device, cfg.seed);

    // ── Step 3: Data ──────────────────────────────────────────────────────────
    let split = get_dataset(cfg, &mut rng)?;
    tracing::info!(
        "{} classes, {} train / {} validation images",
        split.classes.len(),
        split.train.labels().len(),
        split.valid.labels().len()
    );
    tracing::info!("Classes: {:?}", split.classes.names());

    // ── Step 4: Reproducibility artefacts ─────────────────────────────────────
    let ckpt = CheckpointManager::new(&saved_dir)?;
    ckpt.save_config(cfg)?;
    ckpt.save_classes(&split.classes)?;

    // ── Step 5: Model ─────────────────────────────────────────────────────────
    let model_cfg = ModelRegistry::default().resolve(&cfg.model, cfg.num_classes)?;
    if (cfg.img_size as usize) < model_cfg.min_input_size() {
        bail!(
            "--img_size {} is too small for '{}' (needs at least {})",
            cfg.img_size,
            cfg.model,
            model_cfg.min_input_size()
        );
    }
    let model = model_cfg.init::<B>(&device);
    tracing::info!("Model '{}' with {} parameters", cfg.model, model.num_params());

    // ── Step 6: Optimiser + loaders ───────────────────────────────────────────
    let optim   = AdamConfig::new().init();
    let workers = cfg.workers();
    let size    = cfg.img_size as usize;

    // One thread: worker threads hand batches over in completion order,
    // so the training order would no longer follow the seed.
    let train_loader: Arc<dyn DataLoader<B, ImageBatch<B>>> =
        DataLoaderBuilder::new(ImageBatcher::new(size))
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .set_device(device.clone())
            .build(split.train);

    // Validation batch order only changes float rounding of the mean loss.
    let val_loader: Arc<dyn DataLoader<B::InnerBackend, ImageBatch<B::InnerBackend>>> =
        DataLoaderBuilder::new(ImageBatcher::new(size))
            .batch_size(cfg.batch_size)
            .num_workers(workers)
            .set_device(device.clone())
            .build(split.valid);

    let scheduler = cfg.scheduler.build(cfg.lr);

    // ── Step 7: Train ─────────────────────────────────────────────────────────
    let summary = train(model, optim, train_loader, val_loader, scheduler, &device, &saved_dir, cfg)?;

    // ── Step 8: Rebuild the best model from the run directory alone ──────────
    if summary.best.epoch().is_some() {
        let saved_cfg = ckpt.load_config()?;
        let classes   = ckpt.load_classes()?;
        let fresh = ModelRegistry::default()
            .resolve(&saved_cfg.model, saved_cfg.num_classes)?
            .init::<B::InnerBackend>(&device);

        let stem = ckpt.best_stem()?;
        ckpt.load_model(fresh, &stem, &device)?;
        tracing::info!("Best checkpoint '{}' reloads with {} classes", stem, classes.len());
    }

    Ok(summary)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::backend_lock;
    use image::{Rgb, RgbImage};
    use std::fs;

    fn write_dataset(root: &Path) {
        for (class, colour) in [("dark", [10, 10, 10]), ("light", [240, 240, 240])] {
            let dir = root.join("train").join(class);
            fs::create_dir_all(&dir).unwrap();
            for i in 0..6 {
                RgbImage::from_pixel(20, 20, Rgb(colour))
                    .save(dir.join(format!("{i}.png")))
                    .unwrap();
            }
        }
    }

    fn small_config(data: &Path, out: &Path) -> TrainConfig {
        TrainConfig {
            data_dir:    data.to_string_lossy().into_owned(),
            output_dir:  out.to_string_lossy().into_owned(),
            model:       "SmallCnn".into(),
            epochs:      2,
            batch_size:  4,
            img_size:    16,
            num_classes: 2,
            val_ratio:   0.34,
            backend:     BackendKind::Ndarray,
            num_workers: Some(1),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_run_on_ndarray() {
        let _guard = backend_lock();
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        write_dataset(data.path());
        let cfg = small_config(data.path(), out.path());

        let summary = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.saved_dir, out.path().join("exp"));
        assert_eq!(summary.history.len(), 2);
        assert!(summary.history.iter().all(|m| m.train_loss >= 0.0 && m.val_loss >= 0.0));

        let improvements = summary.history.iter().filter(|m| m.improved).count();
        assert_eq!(summary.checkpoints.len(), improvements);

        let run_dir = &summary.saved_dir;
        assert!(run_dir.join("train_config.json").exists());
        assert!(run_dir.join("classes.json").exists());
        assert!(run_dir.join("metrics.csv").exists());
        assert_eq!(run_dir.join("best_checkpoint.json").exists(), improvements > 0);

        // Same name again lands in exp2.
        let second = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(second.saved_dir, out.path().join("exp2"));
    }

    #[test]
    fn test_same_seed_reproduces_history_and_checkpoints() {
        let _guard = backend_lock();
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        write_dataset(data.path());
        let cfg = TrainConfig {
            epochs:      3,
            lr:          1e-2,
            num_workers: Some(3),
            ..small_config(data.path(), out.path())
        };

        let first  = TrainUseCase::new(cfg.clone()).execute().unwrap();
        let second = TrainUseCase::new(cfg).execute().unwrap();
        assert_ne!(first.saved_dir, second.saved_dir);

        for (a, b) in first.history.iter().zip(&second.history) {
            assert_eq!(a.train_loss, b.train_loss, "epoch {}", a.epoch);
            assert_eq!(a.val_f1, b.val_f1, "epoch {}", a.epoch);
            assert_eq!(a.improved, b.improved, "epoch {}", a.epoch);
            assert!((a.val_loss - b.val_loss).abs() < 1e-9, "epoch {}", a.epoch);
        }
        assert_eq!(first.history.len(), second.history.len());

        let names = |s: &TrainSummary| -> Vec<String> {
            s.checkpoints
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.best.value(), second.best.value());
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let _guard = backend_lock();
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        write_dataset(data.path());
        let cfg = TrainConfig { model: "NoSuchNet".into(), ..small_config(data.path(), out.path()) };

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("NoSuchNet"));
    }

    #[test]
    fn test_missing_data_dir_is_rejected() {
        let _guard = backend_lock();
        let out = tempfile::tempdir().unwrap();
        let cfg = small_config(&out.path().join("absent"), out.path());
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_zero_epochs_is_rejected() {
        let cfg = TrainConfig { epochs: 0, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.data_dir, "data/");
        assert_eq!(cfg.model, "BaseModel");
        assert_eq!(cfg.epochs, 20);
        assert_eq!(cfg.lr, 3e-4);
        assert_eq!(cfg.batch_size, 64);
        assert_eq!(cfg.seed, 41);
        assert_eq!(cfg.name, "exp");
        assert!(cfg.workers() >= 1);
    }
}
