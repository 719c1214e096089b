// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses the run flags
// with clap and hands a TrainConfig to Layer 2.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::train_use_case::{TrainConfig, TrainUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "imgcls-train",
    version,
    about = "Train an image classifier and keep the best checkpoint by validation F1."
)]
pub struct Cli {
    #[command(flatten)]
    pub train: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config: TrainConfig = self.train.into();
        tracing::info!("Arguments: {:?}", config);

        let summary = TrainUseCase::new(config).execute()?;

        match summary.best.epoch() {
            Some(epoch) => println!(
                "Training complete. Best F1 {:.5} at epoch {epoch}, saved in {}",
                summary.best.value(),
                summary.saved_dir.display()
            ),
            None => println!(
                "Training complete. No epoch scored above 0; nothing saved in {}",
                summary.saved_dir.display()
            ),
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::BackendKind;
    use crate::ml::scheduler::LrSchedule;

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["imgcls-train"]).unwrap();
        let cfg: TrainConfig = cli.train.into();
        let def = TrainConfig::default();
        assert_eq!(cfg.data_dir, def.data_dir);
        assert_eq!(cfg.model, def.model);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.lr, def.lr);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.seed, def.seed);
        assert_eq!(cfg.name, def.name);
        assert_eq!(cfg.output_dir, def.output_dir);
        assert_eq!(cfg.backend, BackendKind::Wgpu);
        assert_eq!(cfg.scheduler, LrSchedule::None);
        assert_eq!(cfg.num_workers, None);
    }

    #[test]
    fn test_underscore_flags() {
        let cli = Cli::try_parse_from([
            "imgcls-train",
            "--data_dir", "images/",
            "--batch_size", "16",
            "--model", "SmallCnn",
            "--backend", "ndarray",
            "--scheduler", "step:5:0.5",
            "--num_workers", "2",
        ])
        .unwrap();
        let cfg: TrainConfig = cli.train.into();
        assert_eq!(cfg.data_dir, "images/");
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.model, "SmallCnn");
        assert_eq!(cfg.backend, BackendKind::Ndarray);
        assert_eq!(cfg.scheduler, LrSchedule::Step { step_size: 5, gamma: 0.5 });
        assert_eq!(cfg.num_workers, Some(2));
    }

    #[test]
    fn test_startup_log_shows_every_argument() {
        let cli = Cli::try_parse_from(["imgcls-train", "--name", "sweep", "--seed", "7"]).unwrap();
        let config: TrainConfig = cli.train.into();
        let logged = format!("{:?}", config);
        for field in ["data_dir", "model", "epochs", "lr", "batch_size", "seed: 7", "name: \"sweep\"", "scheduler"] {
            assert!(logged.contains(field), "{field} missing from {logged}");
        }
    }

    #[test]
    fn test_bad_scheduler_is_a_parse_error() {
        assert!(Cli::try_parse_from(["imgcls-train", "--scheduler", "warmup"]).is_err());
    }
}
