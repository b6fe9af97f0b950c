//! Concept catalogs for stage direction synthesis.
//!
//! A catalog is a static-per-session table of concepts: each entry names a
//! semantic category the classifier can score text against, the minimum
//! score at which it activates, and the instructional template emitted when
//! it does. Two independent catalogs exist per session: input concepts,
//! evaluated against user messages, and response concepts, evaluated against
//! generated text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Embedded default input-concept catalog (used when no override is configured).
const DEFAULT_INPUT_CONCEPTS: &str = include_str!("defaults/input_concepts.json");

/// Embedded default response-concept catalog.
const DEFAULT_RESPONSE_CONCEPTS: &str = include_str!("defaults/response_concepts.json");

/// A single concept definition as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptEntry {
    /// Concept name the classifier scores text against.
    pub concept: String,
    /// Minimum score at which the concept activates, in `[0, 1]`.
    pub threshold: f64,
    /// Instructional template emitted when the concept activates.
    pub prompt: String,
}

/// An ordered, name-keyed table of concept definitions.
///
/// Immutable after load. Entry order is preserved from the configuration so
/// synthesized direction lines come out in a deterministic order; threshold
/// and template lookups go through the name maps.
#[derive(Debug, Clone, Default)]
pub struct ConceptCatalog {
    names: Vec<String>,
    thresholds: HashMap<String, f64>,
    templates: HashMap<String, String>,
}

impl ConceptCatalog {
    /// Build a catalog from already-decoded entries.
    ///
    /// Rejects thresholds outside `[0, 1]` and duplicate concept names; a
    /// catalog is either fully valid or not built at all.
    pub fn from_entries(entries: Vec<ConceptEntry>) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        for entry in entries {
            if !(0.0..=1.0).contains(&entry.threshold) {
                return Err(ConfigError::ThresholdOutOfRange {
                    concept: entry.concept,
                    threshold: entry.threshold,
                });
            }
            if catalog.thresholds.contains_key(&entry.concept) {
                return Err(ConfigError::DuplicateConcept {
                    concept: entry.concept,
                });
            }
            catalog.names.push(entry.concept.clone());
            catalog
                .thresholds
                .insert(entry.concept.clone(), entry.threshold);
            catalog.templates.insert(entry.concept, entry.prompt);
        }
        Ok(catalog)
    }

    /// Decode a catalog from its JSON configuration form.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let entries: Vec<ConceptEntry> = serde_json::from_str(raw)?;
        Self::from_entries(entries)
    }

    /// The built-in input-concept catalog.
    pub fn default_input() -> Self {
        Self::from_json(DEFAULT_INPUT_CONCEPTS)
            .expect("embedded input concept catalog must decode")
    }

    /// The built-in response-concept catalog.
    pub fn default_response() -> Self {
        Self::from_json(DEFAULT_RESPONSE_CONCEPTS)
            .expect("embedded response concept catalog must decode")
    }

    /// Concept names in configuration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Activation threshold for a concept, if it exists in this catalog.
    pub fn threshold(&self, concept: &str) -> Option<f64> {
        self.thresholds.get(concept).copied()
    }

    /// Instructional template for a concept, if it exists in this catalog.
    pub fn template(&self, concept: &str) -> Option<&str> {
        self.templates.get(concept).map(String::as_str)
    }

    /// Number of concepts in the catalog.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog holds no concepts.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
