// ============================================================
// Layer 3 — ImageSample / ClassIndex Domain Types
// ============================================================
// An ImageSample is one row of the dataset index: where the
// image lives and which class it belongs to, by name.
//
// The model only understands integer labels, so the ClassIndex
// maps class names to 0..n. Names are sorted before indexing,
// which makes the mapping independent of file listing order:
//
//   ["dog", "cat", "dog", "bird"] → bird=0, cat=1, dog=2
//
// Reference: Rust Book §5 (Structs), §8 (Collections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A labelled image reference, before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSample {
    /// Absolute or data-dir-relative path to the image file
    pub path: PathBuf,

    /// Class name as written in the index (CSV cell or folder name)
    pub class_name: String,
}

impl ImageSample {
    pub fn new(path: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        Self {
            path:       path.into(),
            class_name: class_name.into(),
        }
    }
}

/// Sorted, de-duplicated class names. Position = integer label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassIndex {
    names: Vec<String>,
}

impl ClassIndex {
    /// Build the index from every class name seen in `samples`.
    pub fn from_samples(samples: &[ImageSample]) -> Self {
        let mut names: Vec<String> = samples.iter().map(|s| s.class_name.clone()).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Integer label for a class name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn samples(names: &[&str]) -> Vec<ImageSample> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ImageSample::new(format!("{i}.png"), *n))
            .collect()
    }

    #[test]
    fn test_index_is_sorted_and_deduplicated() {
        let idx = ClassIndex::from_samples(&samples(&["dog", "cat", "dog", "bird"]));
        assert_eq!(idx.names(), &["bird", "cat", "dog"]);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn test_index_lookup_round_trips_names() {
        let idx = ClassIndex::from_samples(&samples(&["b", "a", "c"]));
        assert_eq!(idx.index_of("a"), Some(0));
        assert_eq!(idx.index_of("c"), Some(2));
        assert_eq!(idx.index_of("b"), Some(1));
        assert_eq!(idx.index_of("zebra"), None);
    }

    #[test]
    fn test_empty_index() {
        let idx = ClassIndex::from_samples(&[]);
        assert!(idx.is_empty());
    }
}
