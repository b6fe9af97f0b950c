//! Concrete classifier implementations.

pub mod hf_api;

pub use hf_api::HfApiClassifier;
