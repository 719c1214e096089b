// ============================================================
// Layer 4 — Dataset Index Loaders
// ============================================================
// Two on-disk layouts are understood:
//
//   1. CSV index (preferred when present)
//        data/
//          train.csv          ← header: img_path,label
//          train/TRAIN_0000.jpg
//          ...
//      img_path is relative to the data directory.
//
//   2. Class folders
//        data/
//          train/
//            cat/001.png
//            dog/002.jpg
//      The folder name is the class label.
//
// Both return ImageSamples in a deterministic order so a fixed
// seed always yields the same split.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::{sample::ImageSample, traits::SampleSource};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Pick the loader for `data_dir`: CSV if `train.csv` exists, else class folders.
pub fn open_index(data_dir: &Path) -> Result<Box<dyn SampleSource>> {
    if !data_dir.is_dir() {
        bail!("Data directory '{}' does not exist", data_dir.display());
    }

    let csv_path = data_dir.join("train.csv");
    if csv_path.is_file() {
        Ok(Box::new(CsvIndex::new(data_dir)))
    } else {
        Ok(Box::new(FolderIndex::new(data_dir)))
    }
}

// ─── CSV layout ───────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct IndexRow {
    img_path: String,
    label:    String,
}

pub struct CsvIndex {
    data_dir: PathBuf,
}

impl CsvIndex {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn csv_path(&self) -> PathBuf {
        self.data_dir.join("train.csv")
    }
}

impl SampleSource for CsvIndex {
    fn load_all(&self) -> Result<Vec<ImageSample>> {
        let path = self.csv_path();
        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let mut samples = Vec::new();
        for (line, row) in reader.deserialize::<IndexRow>().enumerate() {
            // +2: one for the header, one for 1-based numbering
            let row = row.with_context(|| format!("{}: bad row {}", path.display(), line + 2))?;
            let img_path = row.img_path.trim().trim_start_matches("./");
            samples.push(ImageSample::new(self.data_dir.join(img_path), row.label.trim()));
        }

        tracing::info!("Read {} rows from '{}'", samples.len(), path.display());
        Ok(samples)
    }

    fn describe(&self) -> String {
        format!("csv index '{}'", self.csv_path().display())
    }
}

// ─── Class-folder layout ──────────────────────────────────────────────────────
pub struct FolderIndex {
    data_dir: PathBuf,
}

impl FolderIndex {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn root(&self) -> PathBuf {
        self.data_dir.join("train")
    }
}

impl SampleSource for FolderIndex {
    fn load_all(&self) -> Result<Vec<ImageSample>> {
        let root = self.root();
        let mut class_dirs: Vec<PathBuf> = fs::read_dir(&root)
            .with_context(|| format!("Cannot read directory '{}'", root.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        class_dirs.sort();

        let mut samples = Vec::new();
        for class_dir in class_dirs {
            let Some(class_name) = class_dir.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!("Skipping non-UTF-8 class folder '{}'", class_dir.display());
                continue;
            };

            let mut images: Vec<PathBuf> = fs::read_dir(&class_dir)
                .with_context(|| format!("Cannot read directory '{}'", class_dir.display()))?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            images.sort();

            tracing::debug!("Class '{}': {} images", class_name, images.len());
            samples.extend(images.into_iter().map(|p| ImageSample::new(p, class_name)));
        }

        tracing::info!("Found {} images under '{}'", samples.len(), root.display());
        Ok(samples)
    }

    fn describe(&self) -> String {
        format!("class folders under '{}'", self.root().display())
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
