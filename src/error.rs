//! Error types for the stage direction engine.

use thiserror::Error;

/// Errors raised while decoding configuration or building catalogs.
///
/// All of these are load-time failures: the engine refuses to start a
/// session with a half-built catalog rather than failing mid-turn.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supplied catalog value is not valid JSON of the expected shape.
    #[error("invalid concept catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A concept threshold falls outside the closed unit interval.
    #[error("concept '{concept}' has threshold {threshold} outside [0, 1]")]
    ThresholdOutOfRange { concept: String, threshold: f64 },

    /// The same concept name appears more than once in one catalog.
    #[error("duplicate concept '{concept}' in catalog")]
    DuplicateConcept { concept: String },

    /// A configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A YAML configuration file could not be decoded.
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised by classifier implementations.
///
/// The turn coordinator catches every variant at the call site and treats it
/// as "no scores produced" for that lifecycle moment; none of these abort a
/// turn or a session.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No classifier could be reached for this call.
    #[error("classifier unavailable: {reason}")]
    Unavailable { reason: String },

    /// Transport-level failure talking to a remote classifier.
    #[error("classifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The classifier returned a response the engine cannot interpret.
    #[error("malformed classifier response: {message}")]
    MalformedResponse { message: String },

    /// The classification call exceeded the configured deadline.
    #[error("classification timed out after {seconds}s")]
    Timeout { seconds: f64 },
}
