//! Placeholder substitution for instructional templates.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches `{{name}}` placeholder tokens.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z]*)\}\}").expect("placeholder regex is valid"));

/// Display names substituted into templates, resolved fresh per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    /// The conversation user's display name.
    pub user: String,
    /// The active character's display name; empty when no character applies.
    pub character: String,
}

impl PlaceholderContext {
    /// Value for a placeholder name. Unknown names resolve to empty text so
    /// a template typo degrades instead of failing the turn.
    fn lookup(&self, name: &str) -> &str {
        match name {
            "user" => &self.user,
            "char" => &self.character,
            _ => "",
        }
    }
}

/// Replace every `{{name}}` token in `template` with its context value.
///
/// Single left-to-right scan; substituted text is never rescanned, so there
/// is no recursive or nested resolution.
pub fn resolve_tags(template: &str, ctx: &PlaceholderContext) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| ctx.lookup(&caps[1]).to_string())
        .into_owned()
}
