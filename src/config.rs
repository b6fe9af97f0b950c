//! Engine configuration supplied by the host.
//!
//! Both catalogs are optional overrides: a host that configures nothing gets
//! the embedded default catalogs. Catalog overrides are validated at the
//! boundary; an invalid shape is a [`ConfigError`] at load time and never
//! propagates into the turn loop.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{ConceptCatalog, ConceptEntry};
use crate::classifier::DEFAULT_CLASSIFIER_MODEL;
use crate::error::ConfigError;

/// Default deadline for one classification call, in seconds.
pub const DEFAULT_CLASSIFY_TIMEOUT_SECS: f64 = 30.0;

/// A catalog override as the host may supply it: either an already-decoded
/// entry list or a raw JSON string (the wire form plugin configs use).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogSource {
    /// Structured entries, e.g. from a YAML config file.
    Entries(Vec<ConceptEntry>),
    /// A JSON-encoded entry array, e.g. from a plugin config value.
    Json(String),
}

impl CatalogSource {
    /// Build the catalog, validating shape, thresholds, and uniqueness.
    pub fn build(&self) -> Result<ConceptCatalog, ConfigError> {
        match self {
            Self::Entries(entries) => ConceptCatalog::from_entries(entries.clone()),
            Self::Json(raw) => ConceptCatalog::from_json(raw),
        }
    }
}

/// Host-supplied engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Override for the input-concept catalog; embedded default when absent.
    pub input_concepts: Option<CatalogSource>,
    /// Override for the response-concept catalog; embedded default when absent.
    pub response_concepts: Option<CatalogSource>,
    /// Zero-shot classification model identifier.
    pub classifier_model: String,
    /// Deadline for one classification call, in seconds. Expiry is treated
    /// identically to classifier failure.
    pub classify_timeout_secs: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            input_concepts: None,
            response_concepts: None,
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            classify_timeout_secs: DEFAULT_CLASSIFY_TIMEOUT_SECS,
        }
    }
}

impl StageConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read_file(path.as_ref())?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read_file(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Build the input-concept catalog, falling back to the embedded default.
    pub fn input_catalog(&self) -> Result<ConceptCatalog, ConfigError> {
        match &self.input_concepts {
            Some(source) => source.build(),
            None => Ok(ConceptCatalog::default_input()),
        }
    }

    /// Build the response-concept catalog, falling back to the embedded default.
    pub fn response_catalog(&self) -> Result<ConceptCatalog, ConfigError> {
        match &self.response_concepts {
            Some(source) => source.build(),
            None => Ok(ConceptCatalog::default_response()),
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = StageConfig::default();
        assert_eq!(config.classifier_model, DEFAULT_CLASSIFIER_MODEL);
        assert_eq!(config.classify_timeout_secs, DEFAULT_CLASSIFY_TIMEOUT_SECS);
        assert_eq!(config.input_catalog().unwrap().len(), 6);
        assert_eq!(config.response_catalog().unwrap().len(), 1);
    }

    #[test]
    fn test_json_string_override() {
        let config = StageConfig {
            input_concepts: Some(CatalogSource::Json(
                r#"[{"concept":"tense","threshold":0.5,"prompt":"Tighten up."}]"#.to_string(),
            )),
            ..StageConfig::default()
        };
        let catalog = config.input_catalog().unwrap();
        assert_eq!(catalog.names(), &["tense"]);
    }

    #[test]
    fn test_invalid_override_is_load_time_error() {
        let config = StageConfig {
            input_concepts: Some(CatalogSource::Json("not a catalog".to_string())),
            ..StageConfig::default()
        };
        assert!(config.input_catalog().is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "classifier_model: facebook/bart-large-mnli\n\
             classify_timeout_secs: 5.0\n\
             input_concepts:\n\
             - concept: tense\n  threshold: 0.5\n  prompt: Tighten up."
        )
        .unwrap();

        let config = StageConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.classifier_model, "facebook/bart-large-mnli");
        assert_eq!(config.classify_timeout_secs, 5.0);
        assert_eq!(config.input_catalog().unwrap().names(), &["tense"]);
        // Response concepts were not overridden.
        assert_eq!(config.response_catalog().unwrap().names(), &["flowery"]);
    }

    #[test]
    fn test_from_yaml_file_missing_path() {
        let result = StageConfig::from_yaml_file("/nonexistent/stage.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
