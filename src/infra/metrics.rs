// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one row per epoch to <run dir>/metrics.csv.
//
// Columns:
//   epoch       the epoch number (1, 2, 3, ...)
//   train_loss  mean cross-entropy over training batches
//   val_loss    mean cross-entropy over validation batches
//   val_f1      macro F1 on the validation split
//   lr          learning rate used during the epoch
//   improved    true if this epoch produced a checkpoint
//
// Example:
//   epoch,train_loss,val_loss,val_f1,lr,improved
//   1,3.7124,3.512,0.0812,0.0003,true
//   2,3.1201,3.2543,0.074,0.0003,false
//
// Rows are written with csv::Writer::serialize from EpochMetrics.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

const HEADER: [&str; 6] = ["epoch", "train_loss", "val_loss", "val_f1", "lr", "improved"];

/// One row of metrics for a single epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub val_loss:   f64,
    pub val_f1:     f64,
    pub lr:         f64,
    pub improved:   bool,
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the header if the file is new.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut wtr = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            wtr.write_record(HEADER)?;
            wtr.flush()?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.serialize(m)?;
        wtr.flush()?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_rows() {
        let tmp    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        let rows = [
            EpochMetrics { epoch: 1, train_loss: 1.5, val_loss: 1.25, val_f1: 0.5, lr: 3e-4, improved: true },
            EpochMetrics { epoch: 2, train_loss: 1.1, val_loss: 1.3, val_f1: 0.45, lr: 3e-4, improved: false },
        ];
        for row in &rows {
            logger.log(row).unwrap();
        }

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().next(), Some("epoch,train_loss,val_loss,val_f1,lr,improved"));

        let mut rdr = csv::Reader::from_path(logger.csv_path()).unwrap();
        let back: Vec<EpochMetrics> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_reopening_does_not_duplicate_header() {
        let tmp = tempfile::tempdir().unwrap();
        MetricsLogger::new(tmp.path()).unwrap();
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
