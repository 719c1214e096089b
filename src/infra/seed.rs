// ============================================================
// Layer 6 — Seeding
// ============================================================
// One seed drives every source of randomness in a run:
//   - parameter initialisation and dropout → Backend::seed
//   - train/validation split               → StdRng (data::splitter)
//   - training loader shuffle              → DataLoaderBuilder::shuffle
//
// Reference: Burn Book §5 (Reproducibility)

use burn::tensor::backend::Backend;
use rand::{rngs::StdRng, SeedableRng};

/// Seed the backend RNG for `device` and return a host RNG from the same seed.
pub fn seed_everything<B: Backend>(device: &B::Device, seed: u64) -> StdRng {
    B::seed(device, seed);
    tracing::info!("Seeded backend and host RNGs with {}", seed);
    StdRng::seed_from_u64(seed)
}
