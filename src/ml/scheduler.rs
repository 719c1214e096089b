// ============================================================
// Layer 5 — Epoch Learning-Rate Schedule
// ============================================================
// Optional; stepped once per epoch, after validation.
//
//   none                   constant lr
//   step:<size>:<gamma>    lr · gamma^⌊epoch / size⌋
//   cosine:<t_max>         lr · (1 + cos(π · min(epoch, t_max) / t_max)) / 2

use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LrSchedule {
    #[default]
    None,
    Step { step_size: usize, gamma: f64 },
    Cosine { t_max: usize },
}

impl LrSchedule {
    /// Build a stateful scheduler starting at `base_lr`, or None for a constant rate.
    pub fn build(&self, base_lr: f64) -> Option<EpochScheduler> {
        match self {
            LrSchedule::None => None,
            other => Some(EpochScheduler {
                schedule: other.clone(),
                base_lr,
                epoch: 0,
            }),
        }
    }

    fn lr_at(&self, base_lr: f64, epoch: usize) -> f64 {
        match *self {
            LrSchedule::None => base_lr,
            LrSchedule::Step { step_size, gamma } => {
                base_lr * gamma.powi((epoch / step_size) as i32)
            }
            LrSchedule::Cosine { t_max } => {
                let t = epoch.min(t_max) as f64 / t_max as f64;
                base_lr * (1.0 + (PI * t).cos()) / 2.0
            }
        }
    }
}

impl FromStr for LrSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["none"] => Ok(LrSchedule::None),
            ["step", size, gamma] => {
                let step_size: usize = size
                    .parse()
                    .map_err(|e| format!("bad step size '{size}': {e}"))?;
                let gamma: f64 = gamma
                    .parse()
                    .map_err(|e| format!("bad gamma '{gamma}': {e}"))?;
                if step_size == 0 {
                    return Err("step size must be > 0".into());
                }
                Ok(LrSchedule::Step { step_size, gamma })
            }
            ["cosine", t_max] => {
                let t_max: usize = t_max
                    .parse()
                    .map_err(|e| format!("bad t_max '{t_max}': {e}"))?;
                if t_max == 0 {
                    return Err("t_max must be > 0".into());
                }
                Ok(LrSchedule::Cosine { t_max })
            }
            _ => Err(format!(
                "unknown schedule '{s}' (expected none, step:<size>:<gamma> or cosine:<t_max>)"
            )),
        }
    }
}

impl fmt::Display for LrSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LrSchedule::None => write!(f, "none"),
            LrSchedule::Step { step_size, gamma } => write!(f, "step:{step_size}:{gamma}"),
            LrSchedule::Cosine { t_max } => write!(f, "cosine:{t_max}"),
        }
    }
}

/// Stateful view of an LrSchedule, advanced once per epoch.
#[derive(Debug, Clone)]
pub struct EpochScheduler {
    schedule: LrSchedule,
    base_lr:  f64,
    epoch:    usize,
}

impl EpochScheduler {
    /// Learning rate for the current epoch.
    pub fn lr(&self) -> f64 {
        self.schedule.lr_at(self.base_lr, self.epoch)
    }

    /// Advance one epoch and return the new learning rate.
    pub fn step(&mut self) -> f64 {
        self.epoch += 1;
        self.lr()
    }
}
