//! Turn coordination for the stage direction engine.
//!
//! A turn touches the engine at two lifecycle moments: when a new user
//! message arrives (classify it, then emit directions built from the fresh
//! input weights plus the prior turn's response weights) and when a new
//! generated response arrives (classify it and retain the weights for the
//! next turn). The pipeline within a moment is strictly sequential; the
//! classifier call is the only await point.

use std::sync::Arc;
use std::time::Duration;

use crate::cast::Cast;
use crate::catalog::ConceptCatalog;
use crate::classifier::{generate_call_id, Classification, Classifier};
use crate::config::StageConfig;
use crate::directions;
use crate::error::{ClassifierError, ConfigError};
use crate::state::{SessionState, WeightVector};

/// Coordinates the two lifecycle moments of a conversation turn.
///
/// The director is immutable once built; all mutable turn state lives in the
/// caller-owned [`SessionState`] passed through each lifecycle call, so
/// concurrent sessions never share weight vectors.
#[derive(Debug)]
pub struct StageDirector {
    input_catalog: ConceptCatalog,
    response_catalog: ConceptCatalog,
    classifier: Option<Arc<dyn Classifier>>,
    cast: Cast,
    classify_timeout: Duration,
}

impl StageDirector {
    /// Build a director from configuration, an optional classifier, and the
    /// session's cast.
    ///
    /// Pass `None` for the classifier when initialization failed upstream;
    /// the director then runs every turn with empty classifications instead
    /// of refusing to start. Catalog validation errors are fatal here so the
    /// turn loop never sees a half-built catalog.
    pub fn new(
        config: &StageConfig,
        classifier: Option<Arc<dyn Classifier>>,
        cast: Cast,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            input_catalog: config.input_catalog()?,
            response_catalog: config.response_catalog()?,
            classifier,
            cast,
            classify_timeout: Duration::from_secs_f64(config.classify_timeout_secs),
        })
    }

    /// The catalog evaluated against user messages.
    pub fn input_catalog(&self) -> &ConceptCatalog {
        &self.input_catalog
    }

    /// The catalog evaluated against generated responses.
    pub fn response_catalog(&self) -> &ConceptCatalog {
        &self.response_catalog
    }

    /// Lifecycle moment: a new user message arrived.
    ///
    /// Resets and re-scores the input weights, then synthesizes directions
    /// from the fresh input weights and the response weights retained from
    /// the prior turn. Returns the wrapped direction block, or `None` when
    /// no concept cleared its threshold.
    pub async fn before_prompt(
        &self,
        state: &mut SessionState,
        user_text: &str,
        prompt_for: Option<&str>,
    ) -> Option<String> {
        state.last_input_weights = WeightVector::new();
        if let Some(classification) = self
            .classify(user_text, self.input_catalog.names())
            .await
        {
            merge_weights(&mut state.last_input_weights, &classification);
        }

        let ctx = self.cast.placeholder_context(prompt_for);
        let input_block =
            directions::synthesize(&self.input_catalog, &state.last_input_weights, &ctx);
        let response_block =
            directions::synthesize(&self.response_catalog, &state.last_response_weights, &ctx);
        directions::compose(&input_block, &response_block)
    }

    /// Lifecycle moment: a new generated response arrived.
    ///
    /// Scores the response concepts and merges the result into the retained
    /// response weights; the directions they activate surface on the next
    /// `before_prompt`. Unlike the input side there is no reset first: a
    /// concept scored on an earlier turn keeps its weight until the
    /// classifier scores it again.
    pub async fn after_response(&self, state: &mut SessionState, response_text: &str) {
        if let Some(classification) = self
            .classify(response_text, self.response_catalog.names())
            .await
        {
            merge_weights(&mut state.last_response_weights, &classification);
        }
    }

    /// Score `text` against `labels`, degrading every failure mode
    /// (missing classifier, call error, deadline expiry) to "no scores
    /// produced" for this moment.
    async fn classify(&self, text: &str, labels: &[String]) -> Option<Classification> {
        let classifier = match &self.classifier {
            Some(classifier) => classifier,
            None => {
                log::debug!("no classifier available; skipping classification");
                return None;
            }
        };

        let call_id = generate_call_id();
        log::debug!(
            "classification call {} started: model={}, labels={}",
            call_id,
            classifier.model(),
            labels.len(),
        );

        match tokio::time::timeout(self.classify_timeout, classifier.classify(text, labels)).await
        {
            Ok(Ok(classification)) => Some(classification),
            Ok(Err(err)) => {
                log::warn!("classification call {} failed: {}", call_id, err);
                None
            }
            Err(_) => {
                let err = ClassifierError::Timeout {
                    seconds: self.classify_timeout.as_secs_f64(),
                };
                log::warn!("classification call {} failed: {}", call_id, err);
                None
            }
        }
    }
}

/// Fold label/score pairs into a weight vector, overwriting per key.
fn merge_weights(weights: &mut WeightVector, classification: &Classification) {
    for (label, score) in classification.pairs() {
        weights.insert(label.to_string(), score);
    }
}
