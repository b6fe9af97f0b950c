//! Direction synthesis: threshold filtering, template resolution, wrapping.

use crate::catalog::ConceptCatalog;
use crate::state::WeightVector;
use crate::template::{resolve_tags, PlaceholderContext};

/// Opening delimiter the downstream generator recognizes.
pub const DIRECTION_OPEN: &str = "[INST]";

/// Closing delimiter.
pub const DIRECTION_CLOSE: &str = "[/INST]";

/// Resolve the direction lines one catalog contributes for one weight vector.
///
/// Concepts are visited in catalog order. A concept absent from `weights`
/// never contributes, whatever its threshold; present concepts activate at
/// `score >= threshold` (inclusive boundary). Each surviving concept's
/// template is resolved and appended as its own line.
pub fn synthesize(
    catalog: &ConceptCatalog,
    weights: &WeightVector,
    ctx: &PlaceholderContext,
) -> String {
    let mut lines = Vec::new();
    for name in catalog.names() {
        let Some(score) = weights.get(name).copied() else {
            continue;
        };
        let Some(threshold) = catalog.threshold(name) else {
            continue;
        };
        if score >= threshold {
            if let Some(template) = catalog.template(name) {
                lines.push(resolve_tags(template, ctx));
            }
        }
    }
    lines.join("\n")
}

/// Combine the input and response blocks and wrap them for emission.
///
/// Returns `None` when nothing cleared a threshold this turn; an empty
/// delimited pair is never produced.
pub fn compose(input_block: &str, response_block: &str) -> Option<String> {
    let combined = format!("{}\n{}", input_block, response_block);
    let trimmed = combined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("{}{}{}", DIRECTION_OPEN, trimmed, DIRECTION_CLOSE))
    }
}
