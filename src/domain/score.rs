// ============================================================
// Layer 3 — Best-Score Tracker
// ============================================================
// Tracks the best validation F1 seen so far in a run.
//
// The value starts at 0.0 and is replaced only when a new
// score is STRICTLY greater, so:
//   - the tracked value never decreases
//   - an epoch that merely ties the best does not count
//
// Each improvement produces one checkpoint, named
//   <model>_Epoch_<epoch>_F1_<score with 5 decimals>
//
// Reference: Rust Book §5 (Method Syntax)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    value: f64,
    epoch: Option<usize>,
}

impl BestScore {
    pub fn new() -> Self {
        Self { value: 0.0, epoch: None }
    }

    /// Best score so far (0.0 before any improvement).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Epoch that produced the best score, if any epoch improved on 0.0.
    pub fn epoch(&self) -> Option<usize> {
        self.epoch
    }

    /// Offer an epoch's score. Returns true if it replaced the best.
    /// NaN never compares greater, so it is never accepted.
    pub fn update(&mut self, epoch: usize, score: f64) -> bool {
        if score > self.value {
            self.value = score;
            self.epoch = Some(epoch);
            true
        } else {
            false
        }
    }
}

impl Default for BestScore {
    fn default() -> Self {
        Self::new()
    }
}

/// File stem of the checkpoint written for an improving epoch.
pub fn checkpoint_stem(model_name: &str, epoch: usize, score: f64) -> String {
    format!("{model_name}_Epoch_{epoch}_F1_{score:.5}")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let best = BestScore::new();
        assert_eq!(best.value(), 0.0);
        assert_eq!(best.epoch(), None);
    }

    #[test]
    fn test_only_strict_improvements_replace() {
        let mut best = BestScore::new();
        assert!(best.update(1, 0.70));
        assert!(!best.update(2, 0.65));
        assert!(!best.update(3, 0.70));
        assert_eq!(best.value(), 0.70);
        assert_eq!(best.epoch(), Some(1));
    }

    #[test]
    fn test_zero_score_is_not_an_improvement() {
        let mut best = BestScore::new();
        assert!(!best.update(1, 0.0));
        assert_eq!(best.epoch(), None);
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut best = BestScore::new();
        best.update(1, 0.4);
        assert!(!best.update(2, f64::NAN));
        assert_eq!(best.value(), 0.4);
    }

    #[test]
    fn test_value_is_monotonic() {
        let mut best = BestScore::new();
        let mut last = best.value();
        for (epoch, score) in [0.3, 0.1, 0.5, 0.45, 0.9, 0.2].into_iter().enumerate() {
            best.update(epoch + 1, score);
            assert!(best.value() >= last);
            last = best.value();
        }
        assert_eq!(best.value(), 0.9);
        assert_eq!(best.epoch(), Some(5));
    }

    #[test]
    fn test_checkpoint_stem_format() {
        assert_eq!(
            checkpoint_stem("BaseModel", 3, 0.7123456),
            "BaseModel_Epoch_3_F1_0.71235"
        );
        assert_eq!(checkpoint_stem("SmallCnn", 1, 0.5), "SmallCnn_Epoch_1_F1_0.50000");
    }
}
