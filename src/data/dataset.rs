use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use rand::Rng;
use std::path::Path;

use crate::application::train_use_case::TrainConfig;
use crate::data::{loader::open_index, preprocessor::ImagePreprocessor, splitter::stratified_split};
use crate::domain::sample::{ClassIndex, ImageSample};

/// One decoded image (CHW bytes) and its integer label.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub pixels: Vec<u8>,
    pub label:  usize,
}

pub struct ImageDataset {
    items: Vec<ImageItem>,
}

impl ImageDataset {
    pub fn new(items: Vec<ImageItem>) -> Self { Self { items } }

    /// Decode every sample up front so a bad file fails the run before training.
    pub fn decode(
        samples: &[(ImageSample, usize)],
        pre:     &ImagePreprocessor,
    ) -> Result<Self> {
        let items = samples
            .iter()
            .map(|(sample, label)| -> Result<ImageItem> {
                Ok(ImageItem { pixels: pre.load(&sample.path)?, label: *label })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    pub fn labels(&self) -> Vec<usize> {
        self.items.iter().map(|i| i.label).collect()
    }
}

impl Dataset<ImageItem> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

pub struct DatasetSplit {
    pub train:   ImageDataset,
    pub valid:   ImageDataset,
    pub classes: ClassIndex,
}

/// Load the index under `cfg.data_dir`, encode labels, split and decode.
pub fn get_dataset<R: Rng + ?Sized>(cfg: &TrainConfig, rng: &mut R) -> Result<DatasetSplit> {
    let source  = open_index(Path::new(&cfg.data_dir))?;
    tracing::info!("Loading dataset from {}", source.describe());
    let samples = source.load_all()?;
    if samples.is_empty() {
        bail!("No labelled images found in {}", source.describe());
    }

    let classes = ClassIndex::from_samples(&samples);
    if classes.len() > cfg.num_classes {
        bail!(
            "Dataset has {} classes but the model head has {} (--num_classes)",
            classes.len(),
            cfg.num_classes
        );
    }

    let labelled = samples
        .into_iter()
        .map(|s| -> Result<(ImageSample, usize)> {
            let label = classes
                .index_of(&s.class_name)
                .with_context(|| format!("Class '{}' missing from index", s.class_name))?;
            Ok((s, label))
        })
        .collect::<Result<Vec<_>>>()?;

    let (train, valid) = stratified_split(labelled, cfg.val_ratio, rng, |(_, label)| *label);
    if train.is_empty() {
        bail!("Training split is empty");
    }
    if valid.is_empty() {
        bail!("Validation split is empty (val_ratio = {})", cfg.val_ratio);
    }

    let pre = ImagePreprocessor::new(cfg.img_size);
    tracing::info!(
        "Decoding {} train / {} validation images at {}x{}",
        train.len(),
        valid.len(),
        pre.size(),
        pre.size()
    );

    Ok(DatasetSplit {
        train:   ImageDataset::decode(&train, &pre)?,
        valid:   ImageDataset::decode(&valid, &pre)?,
        classes,
    })
}
