//! # Stagecraft
//!
//! A concept-weighted stage direction engine for multi-turn AI chat.
//!
//! Stagecraft scores each user message and each generated response against a
//! configurable catalog of conversational concepts using an external
//! zero-shot multi-label classifier, persists the resulting weight vectors
//! across turns, and synthesizes templated "stage direction" text from the
//! concepts whose score clears its activation threshold. Non-empty direction
//! blocks are wrapped in an instruction delimiter pair recognized by the
//! downstream text generator.
//!
//! The host runtime drives the engine at two lifecycle moments per turn:
//! [`StageDirector::before_prompt`] when a user message arrives (classify,
//! then emit directions) and [`StageDirector::after_response`] when a
//! generated response arrives (classify and retain for the next turn).

pub mod cast;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod directions;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod state;
pub mod template;

pub use cast::Cast;
pub use catalog::{ConceptCatalog, ConceptEntry};
pub use classifier::providers::HfApiClassifier;
pub use classifier::{Classification, Classifier, DEFAULT_CLASSIFIER_MODEL};
pub use config::{CatalogSource, StageConfig};
pub use engine::StageDirector;
pub use error::{ClassifierError, ConfigError};
pub use persistence::{SessionStore, SqliteSessionStore};
pub use state::{SessionState, WeightVector};
pub use template::PlaceholderContext;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
