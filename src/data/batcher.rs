// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<ImageItem>
// into device tensors.
//
//   Input:  N items, each 3·S·S CHW bytes + a label
//   Output: images [N, 3, S, S] f32 in [0, 1]
//           labels [N]          int
//
// The DataLoader hands the target device to batch(), so the
// tensors land on the accelerator directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::{dataset::ImageItem, preprocessor::CHANNELS};

/// A batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// shape: [batch_size, 3, size, size]
    pub images: Tensor<B, 4>,

    /// shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ImageBatcher {
    size: usize,
}

impl ImageBatcher {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl<B: Backend> Batcher<B, ImageItem, ImageBatch<B>> for ImageBatcher {
    fn batch(&self, items: Vec<ImageItem>, device: &B::Device) -> ImageBatch<B> {
        let batch_size = items.len();

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|item| item.pixels.iter().map(|&p| p as f32 / 255.0))
            .collect();

        let labels: Vec<i64> = items.iter().map(|item| item.label as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, CHANNELS, self.size, self.size]),
            device,
        );
        let labels = Tensor::<B, 1, Int>::from_data(TensorData::new(labels, [batch_size]), device);

        ImageBatch { images, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_scaling() {
        let device  = NdArrayDevice::Cpu;
        let batcher = ImageBatcher::new(2);
        let items = vec![
            ImageItem { pixels: vec![255; 12], label: 3 },
            ImageItem { pixels: vec![0; 12],   label: 1 },
        ];

        let batch = <ImageBatcher as Batcher<TestBackend, ImageItem, ImageBatch<TestBackend>>>::batch(
            &batcher, items, &device,
        );
        assert_eq!(batch.images.dims(), [2, 3, 2, 2]);
        assert_eq!(batch.labels.dims(), [2]);

        let px: Vec<f32> = batch.images.into_data().convert::<f32>().to_vec().unwrap();
        assert!(px[..12].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(px[12..].iter().all(|&v| v == 0.0));

        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(labels, vec![3, 1]);
    }
}
