//! Zero-shot classification over a HuggingFace-style inference endpoint.
//!
//! Sends the text and candidate labels to the hosted inference API for the
//! configured model and decodes the `labels`/`scores` parallel arrays from
//! the response. Network failures, non-success statuses, and unparseable
//! bodies all surface as [`ClassifierError`] values for the turn coordinator
//! to absorb.

use async_trait::async_trait;
use serde_json::Value;

use crate::classifier::{
    generate_call_id, Classification, Classifier, DEFAULT_CLASSIFIER_MODEL,
};
use crate::error::ClassifierError;

/// Default public inference endpoint prefix.
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 120.0;

/// Zero-shot multi-label classifier backed by a HuggingFace-style
/// inference endpoint.
#[derive(Debug, Clone)]
pub struct HfApiClassifier {
    /// Model identifier, e.g. `"Xenova/mobilebert-uncased-mnli"`.
    pub model: String,
    /// Optional bearer token (defaults to the `HF_API_TOKEN` env var).
    pub api_token: Option<String>,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout: f64,
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
}

impl Default for HfApiClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFIER_MODEL, None)
    }
}

impl HfApiClassifier {
    /// Create a new classifier bound to `model`.
    ///
    /// # Arguments
    ///
    /// * `model` - Zero-shot classification model identifier.
    /// * `api_token` - Optional bearer token (defaults to the `HF_API_TOKEN`
    ///   environment variable).
    pub fn new(model: impl Into<String>, api_token: Option<String>) -> Self {
        let api_token = api_token.or_else(|| std::env::var("HF_API_TOKEN").ok());
        Self {
            model: model.into(),
            api_token,
            base_url: None,
            timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: 2,
        }
    }

    /// Full inference URL for the configured model.
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        format!("{}/{}", base.trim_end_matches('/'), self.model)
    }

    /// Build the zero-shot request body.
    fn build_request_body(&self, text: &str, candidate_labels: &[String]) -> Value {
        serde_json::json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": candidate_labels,
                "multi_label": true,
            },
        })
    }

    /// Decode the `labels`/`scores` parallel arrays from a response body.
    fn parse_response(body: &Value) -> Result<Classification, ClassifierError> {
        let labels = body
            .get("labels")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ClassifierError::MalformedResponse {
                message: "missing 'labels' array".to_string(),
            })?
            .iter()
            .map(|v| {
                v.as_str().map(String::from).ok_or_else(|| {
                    ClassifierError::MalformedResponse {
                        message: "non-string label".to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scores = body
            .get("scores")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ClassifierError::MalformedResponse {
                message: "missing 'scores' array".to_string(),
            })?
            .iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| ClassifierError::MalformedResponse {
                    message: "non-numeric score".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if labels.len() != scores.len() {
            return Err(ClassifierError::MalformedResponse {
                message: format!(
                    "{} labels but {} scores",
                    labels.len(),
                    scores.len()
                ),
            });
        }

        Ok(Classification { labels, scores })
    }
}

#[async_trait]
impl Classifier for HfApiClassifier {
    fn model(&self) -> &str {
        &self.model
    }

    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        let call_id = generate_call_id();
        log::debug!(
            "zero-shot call {}: model={}, labels={}",
            call_id,
            self.model,
            candidate_labels.len(),
        );

        let body = self.build_request_body(text, candidate_labels);
        let endpoint = self.endpoint();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs_f64(self.timeout))
            .build()?;

        // Retry with exponential backoff; the hosted API returns transient
        // errors while a cold model spins up.
        let mut last_error: Option<ClassifierError> = None;
        let mut retry_delay = std::time::Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "zero-shot call {} retry attempt {} after {:?}",
                    call_id,
                    attempt,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let mut request = client.post(&endpoint).json(&body);
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    let value: Value = response.json().await?;
                    return Self::parse_response(&value);
                }
                Ok(response) => {
                    let status = response.status();
                    let detail = response.text().await.unwrap_or_default();
                    last_error = Some(ClassifierError::Unavailable {
                        reason: format!("HTTP {}: {}", status, detail),
                    });
                    // Client errors other than rate limiting will not
                    // succeed on retry.
                    if status.is_client_error() && status.as_u16() != 429 {
                        break;
                    }
                }
                Err(err) => {
                    last_error = Some(ClassifierError::Transport(err));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClassifierError::Unavailable {
            reason: "no attempts were made".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let classifier = HfApiClassifier::new("Xenova/mobilebert-uncased-mnli", None);
        assert_eq!(
            classifier.endpoint(),
            "https://api-inference.huggingface.co/models/Xenova/mobilebert-uncased-mnli"
        );

        let custom = HfApiClassifier {
            base_url: Some("http://localhost:8080/models/".to_string()),
            ..classifier
        };
        assert_eq!(
            custom.endpoint(),
            "http://localhost:8080/models/Xenova/mobilebert-uncased-mnli"
        );
    }

    #[test]
    fn test_build_request_body() {
        let classifier = HfApiClassifier::default();
        let labels = vec!["focused".to_string(), "engaged".to_string()];
        let body = classifier.build_request_body("hello", &labels);
        assert_eq!(body["inputs"], "hello");
        assert_eq!(body["parameters"]["multi_label"], true);
        assert_eq!(
            body["parameters"]["candidate_labels"],
            serde_json::json!(["focused", "engaged"])
        );
    }

    #[test]
    fn test_parse_response_parallel_arrays() {
        let body = serde_json::json!({
            "sequence": "hello",
            "labels": ["focused", "engaged"],
            "scores": [0.91, 0.12],
        });
        let classification = HfApiClassifier::parse_response(&body).unwrap();
        assert_eq!(classification.labels, vec!["focused", "engaged"]);
        assert_eq!(classification.scores, vec![0.91, 0.12]);
    }

    #[test]
    fn test_parse_response_rejects_missing_fields() {
        let body = serde_json::json!({"labels": ["a"]});
        assert!(matches!(
            HfApiClassifier::parse_response(&body),
            Err(ClassifierError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_parse_response_rejects_length_mismatch() {
        let body = serde_json::json!({"labels": ["a", "b"], "scores": [0.5]});
        assert!(matches!(
            HfApiClassifier::parse_response(&body),
            Err(ClassifierError::MalformedResponse { .. })
        ));
    }
}
