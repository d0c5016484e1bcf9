//! Session state store
//!
//! Holds the most recent scene description and extracted text for one
//! interactive session. The two slots are independent: setting one never
//! touches the other. There is exactly one writer and one reader (the
//! orchestrator), so plain owned fields behind accessors are enough.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-session result store
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    started_at: DateTime<Utc>,
    scene_description: Option<String>,
    extracted_text: Option<String>,
}

impl SessionState {
    /// Start a new, empty session
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            scene_description: None,
            extracted_text: None,
        }
    }

    /// Session identifier, for logs and the session endpoint
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When this session started
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Most recent scene description, if any
    #[must_use]
    pub fn scene(&self) -> Option<&str> {
        self.scene_description.as_deref()
    }

    /// Store a scene description, replacing any previous one
    pub fn set_scene(&mut self, description: impl Into<String>) {
        self.scene_description = Some(description.into());
    }

    /// Most recent extracted text, if any
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    /// Store extracted text, replacing any previous extraction
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.extracted_text = Some(text.into());
    }

    /// Text to narrate: the scene description when present, otherwise the
    /// extracted text, otherwise nothing
    ///
    /// A stored blank result (OCR on an image with no text yields an empty
    /// string) counts as nothing: it neither narrates nor shadows the
    /// other slot.
    #[must_use]
    pub fn narration_text(&self) -> Option<&str> {
        self.scene()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.text().filter(|s| !s.trim().is_empty()))
    }

    /// Whether neither slot holds a result yet
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scene_description.is_none() && self.extracted_text.is_none()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let state = SessionState::new();
        assert!(state.is_empty());
        assert!(state.scene().is_none());
        assert!(state.text().is_none());
        assert!(state.narration_text().is_none());
    }

    #[test]
    fn slots_are_independent() {
        let mut state = SessionState::new();

        state.set_text("STOP");
        state.set_scene("a street crossing");
        assert_eq!(state.text(), Some("STOP"));

        state.set_scene("a kitchen counter");
        assert_eq!(state.text(), Some("STOP"));

        state.set_text("EXIT");
        assert_eq!(state.scene(), Some("a kitchen counter"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let mut state = SessionState::new();
        state.set_scene("first");
        state.set_scene("second");
        assert_eq!(state.scene(), Some("second"));
    }

    #[test]
    fn narration_prefers_scene_description() {
        let mut state = SessionState::new();
        state.set_text("extracted");
        assert_eq!(state.narration_text(), Some("extracted"));

        state.set_scene("described");
        assert_eq!(state.narration_text(), Some("described"));
    }

    #[test]
    fn blank_results_are_not_narratable() {
        let mut state = SessionState::new();
        state.set_text("");
        assert_eq!(state.narration_text(), None);

        // a blank scene must not shadow real extracted text
        state.set_text("STOP");
        state.set_scene("   ");
        assert_eq!(state.narration_text(), Some("STOP"));
    }

    #[test]
    fn new_sessions_get_distinct_ids() {
        assert_ne!(SessionState::new().id(), SessionState::new().id());
    }
}
