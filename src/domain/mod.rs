// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that name the core concepts
// of a training run.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled image on disk and the class-name ↔ index mapping
pub mod sample;

// Best-score bookkeeping and checkpoint naming
pub mod score;

// Core abstractions (traits) that other layers implement
pub mod traits;
