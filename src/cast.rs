//! Directory of user and character display names for a session.
//!
//! The host supplies display names at session start; the engine consults
//! them when resolving placeholders each turn. Nothing here is persisted.

use std::collections::HashMap;

use crate::template::PlaceholderContext;

/// Display-name directory for one conversation session.
#[derive(Debug, Clone, Default)]
pub struct Cast {
    user_name: String,
    characters: HashMap<String, String>,
}

impl Cast {
    /// Create a cast with the conversation user's display name.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            characters: HashMap::new(),
        }
    }

    /// Builder-style character registration.
    pub fn with_character(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.characters.insert(id.into(), name.into());
        self
    }

    /// Register a character display name under its id.
    pub fn add_character(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.characters.insert(id.into(), name.into());
    }

    /// The conversation user's display name.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Display name for a character id, if registered.
    pub fn character_name(&self, id: &str) -> Option<&str> {
        self.characters.get(id).map(String::as_str)
    }

    /// Resolve the placeholder context for one turn.
    ///
    /// A character id with no directory entry resolves to an empty name
    /// rather than failing synthesis.
    pub fn placeholder_context(&self, prompt_for: Option<&str>) -> PlaceholderContext {
        PlaceholderContext {
            user: self.user_name.clone(),
            character: prompt_for
                .and_then(|id| self.characters.get(id))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_context_with_known_character() {
        let cast = Cast::new("Alex").with_character("c1", "Mira");
        assert_eq!(cast.user_name(), "Alex");
        assert_eq!(cast.character_name("c1"), Some("Mira"));

        let ctx = cast.placeholder_context(Some("c1"));
        assert_eq!(ctx.user, "Alex");
        assert_eq!(ctx.character, "Mira");
    }

    #[test]
    fn test_placeholder_context_with_unknown_character() {
        let cast = Cast::new("Alex");
        let ctx = cast.placeholder_context(Some("missing"));
        assert_eq!(ctx.user, "Alex");
        assert_eq!(ctx.character, "");
    }

    #[test]
    fn test_placeholder_context_without_target() {
        let cast = Cast::new("Alex").with_character("c1", "Mira");
        let ctx = cast.placeholder_context(None);
        assert_eq!(ctx.character, "");
    }
}
