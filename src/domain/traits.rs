// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against concrete loaders or recorders:
//
//   - CsvIndex / FolderIndex implement SampleSource
//   - CheckpointManager implements CheckpointSink
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::sample::ImageSample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can enumerate the labelled images of a dataset.
///
/// Implementations:
///   - CsvIndex    → `train.csv` with `img_path,label` columns
///   - FolderIndex → `train/<class>/<image>` directory layout
pub trait SampleSource {
    /// List every labelled image. Order must be deterministic.
    fn load_all(&self) -> Result<Vec<ImageSample>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

// ─── CheckpointSink ───────────────────────────────────────────────────────────
/// Anything that can persist a snapshot of a model under a file stem.
///
/// After `save` returns Ok, the checkpoint exists at the returned path.
pub trait CheckpointSink<M> {
    fn save(&self, model: &M, file_stem: &str) -> Result<PathBuf>;
}
