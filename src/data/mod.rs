// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from image files on disk to device tensors.
//
//   train.csv / train/<class>/
//       │
//       ▼
//   loader            → lists (path, class name) samples
//       │
//       ▼
//   ClassIndex        → class names → integer labels
//       │
//       ▼
//   splitter          → seeded stratified train / validation split
//       │
//       ▼
//   preprocessor      → decode, resize, CHW bytes
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks items into [N, 3, S, S] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the dataset index (CSV or class folders)
pub mod loader;

/// Decodes and resizes image files
pub mod preprocessor;

/// Implements Burn's Dataset trait for decoded images
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded, stratified train/validation split
pub mod splitter;
