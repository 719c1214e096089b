// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Model definitions and the training loop.
//
//   model.rs     — ImageClassifier: stacked conv blocks
//                  (conv 3x3 → ReLU → max-pool 2x2),
//                  global average pool, dropout, linear head
//
//   registry.rs  — model name → architecture config
//                  (BaseModel, SmallCnn, WideCnn)
//
//   metric.rs    — macro-averaged F1 over validation predictions
//
//   scheduler.rs — optional per-epoch learning-rate schedule
//
//   trainer.rs   — epoch loop: train, validate, log, checkpoint
//                  on strict F1 improvement
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// CNN image classifier architecture
pub mod model;

/// Named model constructors
pub mod registry;

/// Validation score
pub mod metric;

/// Learning-rate schedules
pub mod scheduler;

/// Full training loop with validation and checkpointing
pub mod trainer;
