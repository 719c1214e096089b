// ============================================================
// Layer 5 — Model Registry
// ============================================================
// Maps a model name (the --model flag) to a constructor that
// builds the architecture config for a given class count.
//
//   "BaseModel" → 3 conv blocks (32, 64, 128), hidden 256
//   "SmallCnn"  → 2 conv blocks (16, 32),      hidden 64
//   "WideCnn"   → 4 conv blocks (64..512),     hidden 512
//
// Unknown names fail with the list of registered models.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::ml::model::ClassifierConfig;

pub type ModelConstructor = fn(num_classes: usize) -> ClassifierConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown model '{name}' (available: {available})")]
    UnknownModel { name: String, available: String },
}

pub struct ModelRegistry {
    entries: BTreeMap<&'static str, ModelConstructor>,
}

impl ModelRegistry {
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Add or replace a constructor under `name`.
    pub fn register(&mut self, name: &'static str, ctor: ModelConstructor) -> &mut Self {
        self.entries.insert(name, ctor);
        self
    }

    pub fn resolve(&self, name: &str, num_classes: usize) -> Result<ClassifierConfig, RegistryError> {
        self.entries
            .get(name)
            .map(|ctor| ctor(num_classes))
            .ok_or_else(|| RegistryError::UnknownModel {
                name:      name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("BaseModel", base_model)
            .register("SmallCnn", small_cnn)
            .register("WideCnn", wide_cnn);
        registry
    }
}

fn base_model(num_classes: usize) -> ClassifierConfig {
    ClassifierConfig::new(num_classes, vec![32, 64, 128], 256)
}

fn small_cnn(num_classes: usize) -> ClassifierConfig {
    ClassifierConfig::new(num_classes, vec![16, 32], 64).with_dropout(0.1)
}

fn wide_cnn(num_classes: usize) -> ClassifierConfig {
    ClassifierConfig::new(num_classes, vec![64, 128, 256, 512], 512).with_dropout(0.5)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models_are_registered() {
        let registry = ModelRegistry::default();
        assert_eq!(registry.names(), vec!["BaseModel", "SmallCnn", "WideCnn"]);
    }

    #[test]
    fn test_resolve_passes_class_count() {
        let cfg = ModelRegistry::default().resolve("BaseModel", 50).unwrap();
        assert_eq!(cfg.num_classes, 50);
        assert_eq!(cfg.channels, vec![32, 64, 128]);
    }

    #[test]
    fn test_unknown_model_lists_available_names() {
        let err = ModelRegistry::default().resolve("ResNet9000", 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown model 'ResNet9000' (available: BaseModel, SmallCnn, WideCnn)"
        );
    }

    #[test]
    fn test_custom_registration() {
        fn tiny(n: usize) -> ClassifierConfig {
            ClassifierConfig::new(n, vec![2], 2)
        }
        let mut registry = ModelRegistry::empty();
        registry.register("Tiny", tiny);
        assert_eq!(registry.resolve("Tiny", 3).unwrap().hidden, 2);
        assert!(registry.resolve("BaseModel", 3).is_err());
    }
}
