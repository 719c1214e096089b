// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// Files in a run directory:
//   output/model/exp/
//     BaseModel_Epoch_1_F1_0.41230.mpk   ← weights after an improving epoch
//     BaseModel_Epoch_4_F1_0.55012.mpk
//     best_checkpoint.json               ← stem of the latest (best) checkpoint
//     train_config.json                  ← run configuration
//     classes.json                       ← class name ↔ label mapping
//
// Checkpoints are only ever added, never deleted.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use std::{
    fs,
    path::PathBuf,
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::{sample::ClassIndex, traits::CheckpointSink};
use crate::ml::model::ImageClassifier;

const BEST_POINTER: &str = "best_checkpoint.json";
const CONFIG_FILE:  &str = "train_config.json";
const CLASSES_FILE: &str = "classes.json";

/// Manages saving and loading of checkpoints inside one run directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Full path of a checkpoint file for `file_stem`.
    ///
    /// The stem contains a dot (`F1_0.71235`), and the recorder calls
    /// `set_extension` on the path it is given, so the extension is
    /// appended here up front.
    pub fn checkpoint_path<B: Backend>(&self, file_stem: &str) -> PathBuf {
        let ext = <CompactRecorder as FileRecorder<B>>::file_extension();
        self.dir.join(format!("{file_stem}.{ext}"))
    }

    /// Serialise the model record to `<dir>/<file_stem>.<ext>` and point
    /// `best_checkpoint.json` at it.
    pub fn save_model<B: Backend>(
        &self,
        model:     &ImageClassifier<B>,
        file_stem: &str,
    ) -> Result<PathBuf> {
        let path = self.checkpoint_path::<B>(file_stem);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        fs::write(self.dir.join(BEST_POINTER), serde_json::to_string(file_stem)?)
            .with_context(|| format!("Failed to write {BEST_POINTER}"))?;

        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(path)
    }

    /// Load the weights stored under `file_stem` into `model`.
    ///
    /// `model` must have the same architecture as the saved one.
    pub fn load_model<B: Backend>(
        &self,
        model:     ImageClassifier<B>,
        file_stem: &str,
        device:    &B::Device,
    ) -> Result<ImageClassifier<B>> {
        let path = self.checkpoint_path::<B>(file_stem);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Stem of the most recently saved (and therefore best) checkpoint.
    pub fn best_stem(&self) -> Result<String> {
        let path = self.dir.join(BEST_POINTER);
        let s = fs::read_to_string(&path).with_context(|| {
            format!("No checkpoint recorded in '{}'", self.dir.display())
        })?;
        Ok(serde_json::from_str(&s)?)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn save_classes(&self, classes: &ClassIndex) -> Result<()> {
        self.write_json(CLASSES_FILE, classes)
    }

    pub fn load_classes(&self) -> Result<ClassIndex> {
        self.read_json(CLASSES_FILE)
    }

    fn write_json<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

impl<B: Backend> CheckpointSink<ImageClassifier<B>> for CheckpointManager {
    fn save(&self, model: &ImageClassifier<B>, file_stem: &str) -> Result<PathBuf> {
        self.save_model(model, file_stem)
    }
}
