//! Zero-shot multi-label classification port.
//!
//! The engine never implements classification itself; it consumes the
//! capability through the [`Classifier`] trait so a session can run against
//! a remote inference service in production and a deterministic fake in
//! tests. Scores are independent per label (multi-label): each is the
//! label's own probability of applying, not a share of a distribution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClassifierError;

pub mod providers;

/// Default zero-shot classification model identifier.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "Xenova/mobilebert-uncased-mnli";

/// Result of scoring one text against a set of candidate labels.
///
/// `labels` and `scores` are parallel arrays with one score per label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classification {
    /// Candidate labels, as echoed back by the classifier.
    pub labels: Vec<String>,
    /// Score in `[0, 1]` for the label at the same index.
    pub scores: Vec<f64>,
}

impl Classification {
    /// Iterate label/score pairs.
    ///
    /// Truncates to the shorter array if a backend returns mismatched
    /// lengths, so a ragged response degrades instead of panicking.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
    }
}

/// Generate a unique id for one classification call, for debug logging.
pub fn generate_call_id() -> String {
    Uuid::new_v4().to_string()
}

/// Abstract zero-shot multi-label classifier.
///
/// Implementations are expected to be initialized once per session and
/// reused for every turn. Latency is non-trivial (model inference), so the
/// call is always awaited and must be cancellable from the outside via a
/// timeout.
#[async_trait]
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// The model identifier this classifier is bound to.
    fn model(&self) -> &str;

    /// Score `text` independently against each of `candidate_labels`.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Classification, ClassifierError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    /// Deterministic classifier for tests: returns preset scores for the
    /// requested labels, or fails on demand.
    #[derive(Debug, Default)]
    pub(crate) struct FakeClassifier {
        pub scores: HashMap<String, f64>,
        pub fail: bool,
        pub delay: Option<Duration>,
        /// Label/score pairs returned on every call even though they were
        /// never requested, to exercise stray-label handling.
        pub extra_labels: Vec<(String, f64)>,
    }

    impl FakeClassifier {
        pub(crate) fn scoring(pairs: &[(&str, f64)]) -> Self {
            Self {
                scores: pairs
                    .iter()
                    .map(|(label, score)| (label.to_string(), *score))
                    .collect(),
                ..Self::default()
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Classifier for FakeClassifier {
        fn model(&self) -> &str {
            "fake-mnli"
        }

        async fn classify(
            &self,
            _text: &str,
            candidate_labels: &[String],
        ) -> Result<Classification, ClassifierError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ClassifierError::Unavailable {
                    reason: "fake classifier set to fail".to_string(),
                });
            }
            let mut result = Classification::default();
            for label in candidate_labels {
                if let Some(score) = self.scores.get(label) {
                    result.labels.push(label.clone());
                    result.scores.push(*score);
                }
            }
            for (label, score) in &self.extra_labels {
                result.labels.push(label.clone());
                result.scores.push(*score);
            }
            Ok(result)
        }
    }
}
