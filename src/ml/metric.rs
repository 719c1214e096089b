// ============================================================
// Layer 5 — Competition Metric (macro F1)
// ============================================================
// For each class c present in either the labels or the
// predictions:
//
//   F1_c = 2·TP / (2·TP + FP + FN)      (0 when the denominator is 0)
//
// The score is the unweighted mean of F1_c over those classes,
// so rare classes count as much as common ones.
//
// Example (3 classes):
//   labels = [0, 1, 2, 0, 1, 2]
//   preds  = [0, 2, 1, 0, 0, 1]
//   F1_0 = 0.8, F1_1 = 0.0, F1_2 = 0.0  → macro F1 = 0.2667

use anyhow::{bail, Result};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Macro-averaged F1 of `preds` against `labels`. Empty input scores 0.0.
pub fn competition_metric(labels: &[usize], preds: &[usize]) -> Result<f64> {
    if labels.len() != preds.len() {
        bail!(
            "label/prediction length mismatch: {} labels, {} predictions",
            labels.len(),
            preds.len()
        );
    }
    if labels.is_empty() {
        return Ok(0.0);
    }

    let mut per_class: BTreeMap<usize, Counts> = BTreeMap::new();
    for (&truth, &pred) in labels.iter().zip(preds) {
        if truth == pred {
            per_class.entry(truth).or_default().tp += 1;
        } else {
            per_class.entry(pred).or_default().fp += 1;
            per_class.entry(truth).or_default().fn_ += 1;
        }
    }

    let sum: f64 = per_class
        .values()
        .map(|c| {
            let denom = 2 * c.tp + c.fp + c.fn_;
            if denom == 0 {
                0.0
            } else {
                (2 * c.tp) as f64 / denom as f64
            }
        })
        .sum();

    Ok(sum / per_class.len() as f64)
}
