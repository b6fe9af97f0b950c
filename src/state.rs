//! Per-conversation weight state carried across turns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mapping from concept name to its most recent classifier score in `[0, 1]`.
///
/// Unknown concept names never appear as keys; the vector only ever holds
/// labels the classifier was asked about.
pub type WeightVector = HashMap<String, f64>;

/// Concept weights persisted across turns of one conversation.
///
/// After the first completed turn, `last_input_weights` reflects the most
/// recent user message and `last_response_weights` the most recent generated
/// response strictly prior to the current one. Response weights are read
/// while producing the next turn's directions, before being overwritten, so
/// they always lag one turn.
///
/// Created empty at session start, mutated exactly twice per turn (once per
/// lifecycle moment), and serialized out after every mutation so it survives
/// process restarts between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Weights from classifying the most recent user message.
    #[serde(default)]
    pub last_input_weights: WeightVector,
    /// Weights from classifying the prior turn's generated response.
    #[serde(default)]
    pub last_response_weights: WeightVector,
}

impl SessionState {
    /// Fresh state for a new conversation session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize for host-side persistence between turns.
    pub fn snapshot(&self) -> Value {
        serde_json::json!({
            "lastInputWeights": self.last_input_weights,
            "lastResponseWeights": self.last_response_weights,
        })
    }

    /// Rebuild from a host-persisted snapshot.
    ///
    /// Missing or malformed fields come back empty so a session can resume
    /// from partial state instead of refusing to start.
    pub fn from_snapshot(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip_is_identity() {
        let mut state = SessionState::new();
        state.last_input_weights.insert("focused".to_string(), 0.85);
        state
            .last_response_weights
            .insert("flowery".to_string(), 0.91);

        let restored = SessionState::from_snapshot(&state.snapshot());
        assert_eq!(restored, state);
    }

    #[test]
    fn test_serde_round_trip_is_identity() {
        let mut state = SessionState::new();
        state.last_input_weights.insert("engaged".to_string(), 0.6);

        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_snapshot_uses_wire_field_names() {
        let mut state = SessionState::new();
        state.last_input_weights.insert("focused".to_string(), 0.85);

        let snapshot = state.snapshot();
        assert_eq!(snapshot["lastInputWeights"]["focused"], 0.85);
        assert!(snapshot.get("lastResponseWeights").is_some());
    }

    #[test]
    fn test_from_snapshot_tolerates_partial_state() {
        let restored = SessionState::from_snapshot(&serde_json::json!({
            "lastInputWeights": {"focused": 0.7}
        }));
        assert_eq!(restored.last_input_weights.get("focused"), Some(&0.7));
        assert!(restored.last_response_weights.is_empty());

        let restored = SessionState::from_snapshot(&serde_json::json!(null));
        assert!(restored.last_input_weights.is_empty());
    }
}
