// ============================================================
// Layer 4 — Stratified Train/Validation Splitter
// ============================================================
// Splits samples into training and validation sets while
// keeping each class's share roughly equal in both:
//
//   for each class (in label order):
//     shuffle that class's samples with the run's RNG
//     move round(n · val_ratio) of them to validation
//     (a class always keeps at least one training sample)
//
// Uses a caller-provided seeded RNG, so the same seed always
// produces the same split.
//
// Reference: rand crate documentation (SliceRandom)

use rand::{seq::SliceRandom, Rng};
use std::collections::BTreeMap;

/// Split `samples` into (train, validation), stratified by `label_of`.
pub fn stratified_split<T, R, F>(
    samples:   Vec<T>,
    val_ratio: f64,
    rng:       &mut R,
    label_of:  F,
) -> (Vec<T>, Vec<T>)
where
    R: Rng + ?Sized,
    F: Fn(&T) -> usize,
{
    let total = samples.len();
    let val_ratio = val_ratio.clamp(0.0, 1.0);

    let mut by_class: BTreeMap<usize, Vec<T>> = BTreeMap::new();
    for sample in samples {
        by_class.entry(label_of(&sample)).or_default().push(sample);
    }

    let mut train = Vec::with_capacity(total);
    let mut val   = Vec::new();

    for (_, mut group) in by_class {
        group.shuffle(rng);

        let n     = group.len();
        let n_val = ((n as f64) * val_ratio).round() as usize;
        let n_val = n_val.min(n.saturating_sub(1));

        let held_out = group.split_off(n - n_val);
        train.extend(group);
        val.extend(held_out);
    }

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        train.len(),
        val.len(),
    );

    (train, val)
}
