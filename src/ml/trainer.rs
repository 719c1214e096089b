// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over Burn DataLoaders with Adam (or any Optimizer).
//
// Per epoch:
//   1. train: forward → cross-entropy → backward → optimiser step
//   2. validate on the inner backend (no autodiff, dropout off)
//   3. log losses + macro F1, append metrics.csv
//   4. step the lr schedule, if any
//   5. checkpoint if val F1 strictly beats the best so far
//
// Key Burn insight:
//   - Training uses B (Autodiff<...>) for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - so the validation loader must batch for B::InnerBackend
//   - argmax(1) returns [batch, 1]; flatten before reading out
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{anyhow, bail, Result};
use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig},
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::ImageBatch;
use crate::domain::{
    score::{checkpoint_stem, BestScore},
    traits::CheckpointSink,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{metric::competition_metric, model::ImageClassifier, scheduler::EpochScheduler};

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub best:        BestScore,
    pub checkpoints: Vec<PathBuf>,
    pub history:     Vec<EpochMetrics>,
    pub saved_dir:   PathBuf,
}

#[allow(clippy::too_many_arguments)]
pub fn train<B, O>(
    mut model:    ImageClassifier<B>,
    mut optim:    O,
    train_loader: Arc<dyn DataLoader<B, ImageBatch<B>>>,
    val_loader:   Arc<dyn DataLoader<B::InnerBackend, ImageBatch<B::InnerBackend>>>,
    mut scheduler: Option<EpochScheduler>,
    device:       &B::Device,
    saved_dir:    &Path,
    cfg:          &TrainConfig,
) -> Result<TrainSummary>
where
    B: AutodiffBackend,
    O: Optimizer<ImageClassifier<B>, B>,
{
    let ckpt    = CheckpointManager::new(saved_dir)?;
    let metrics = MetricsLogger::new(saved_dir)?;

    let criterion: CrossEntropyLoss<B> = CrossEntropyLossConfig::new().init(device);
    let val_criterion: CrossEntropyLoss<B::InnerBackend> = CrossEntropyLossConfig::new().init(device);

    let mut best        = BestScore::new();
    let mut checkpoints = Vec::new();
    let mut history     = Vec::with_capacity(cfg.epochs);
    let mut lr          = scheduler.as_ref().map_or(cfg.lr, EpochScheduler::lr);

    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let bar = progress_bar(
            train_loader.num_items().div_ceil(cfg.batch_size.max(1)),
            format!("epoch {epoch}/{}", cfg.epochs),
        )?;
        let mut train_losses = Vec::new();

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.labels, &criterion);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_losses.push(loss_val);

            // Gradients are consumed by the step, so there is nothing to zero.
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);

            bar.set_message(format!("loss {loss_val:.4}"));
            bar.inc(1);
        }
        bar.finish_and_clear();

        let Some(train_loss) = mean(&train_losses) else {
            bail!("Training loader produced no batches");
        };
        if !train_loss.is_finite() {
            bail!("Training loss diverged at epoch {epoch} (mean = {train_loss})");
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let (val_loss, val_score) = validate(&model.valid(), &val_criterion, val_loader.as_ref())?;

        println!(
            "Epoch [{epoch}], Train Loss : [{train_loss:.5}] Val Loss : [{val_loss:.5}] Val F1 Score : [{val_score:.5}]"
        );

        let epoch_lr = lr;
        if let Some(s) = scheduler.as_mut() {
            lr = s.step();
            tracing::debug!("lr {:.3e} → {:.3e}", epoch_lr, lr);
        }

        // ── Best-model checkpoint ─────────────────────────────────────────────
        let saved = checkpoint_if_improved(&mut best, &ckpt, &model, &cfg.model, epoch, val_score)?;
        let improved = saved.is_some();
        checkpoints.extend(saved);

        let row = EpochMetrics { epoch, train_loss, val_loss, val_f1: val_score, lr: epoch_lr, improved };
        metrics.log(&row)?;
        history.push(row);
    }

    tracing::info!(
        "Training complete: best F1 {:.5} at epoch {:?}, {} checkpoint(s) in '{}', metrics in '{}'",
        best.value(),
        best.epoch(),
        checkpoints.len(),
        saved_dir.display(),
        metrics.csv_path().display()
    );

    Ok(TrainSummary { best, checkpoints, history, saved_dir: saved_dir.to_path_buf() })
}

/// Mean loss and macro F1 over the whole validation loader.
pub fn validate<B: Backend>(
    model:     &ImageClassifier<B>,
    criterion: &CrossEntropyLoss<B>,
    loader:    &dyn DataLoader<B, ImageBatch<B>>,
) -> Result<(f64, f64)> {
    let mut losses      = Vec::new();
    let mut preds       = Vec::with_capacity(loader.num_items());
    let mut true_labels = Vec::with_capacity(loader.num_items());

    for batch in loader.iter() {
        let (loss, logits) = model.forward_loss(batch.images, batch.labels.clone(), criterion);
        losses.push(loss.into_scalar().elem::<f64>());

        // argmax(1) is [batch, 1]
        preds.extend(int_tensor_to_labels(logits.argmax(1).flatten::<1>(0, 1))?);
        true_labels.extend(int_tensor_to_labels(batch.labels)?);
    }

    let Some(val_loss) = mean(&losses) else {
        bail!("Validation loader produced no batches");
    };
    let score = competition_metric(&true_labels, &preds)?;
    Ok((val_loss, score))
}

/// Offer `score` to `best`; on a strict improvement, save the model under
/// `<model>_Epoch_<epoch>_F1_<score>` and return the checkpoint path.
pub fn checkpoint_if_improved<M, S: CheckpointSink<M>>(
    best:       &mut BestScore,
    sink:       &S,
    model:      &M,
    model_name: &str,
    epoch:      usize,
    score:      f64,
) -> Result<Option<PathBuf>> {
    if !best.update(epoch, score) {
        return Ok(None);
    }

    let stem = checkpoint_stem(model_name, epoch, best.value());
    let path = sink.save(model, &stem)?;
    tracing::info!("New best F1 {:.5} at epoch {} → '{}'", best.value(), epoch, path.display());
    Ok(Some(path))
}

fn int_tensor_to_labels<B: Backend>(t: Tensor<B, 1, Int>) -> Result<Vec<usize>> {
    let values: Vec<i64> = t
        .into_data()
        .convert::<i64>()
        .to_vec()
        .map_err(|e| anyhow!("Cannot read label tensor: {e:?}"))?;
    Ok(values.into_iter().map(|v| v as usize).collect())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn progress_bar(len: usize, prefix: String) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template(
        "{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
    )?);
    bar.set_prefix(prefix);
    Ok(bar)
}
