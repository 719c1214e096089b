// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem or global
// process state:
//
//   checkpoint.rs — model weights via Burn's CompactRecorder,
//                   plus the run's config and class index as JSON
//
//   paths.rs      — collision-free run directory names
//                   (exp, exp2, exp3, ...)
//
//   seed.rs       — seeds the backend and host RNGs
//
//   metrics.rs    — per-epoch metrics CSV
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Run directory naming
pub mod paths;

/// RNG seeding
pub mod seed;

/// Training metrics CSV logger
pub mod metrics;
