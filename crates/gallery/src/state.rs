/// Session state model rendered by the presentation layer
use store::VideoArtifact;

/// Prompt a fresh create draft starts from
pub const DEFAULT_DRAFT_PROMPT: &str =
    "A cinematic, photorealistic shot of an astronaut riding a horse on Mars.";

/// A not-yet-generated placeholder being edited. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Editable prompt text
    pub prompt: String,

    /// Source artifact when remixing; `None` for create-from-scratch
    pub remix_of: Option<VideoArtifact>,
}

impl Draft {
    /// Fresh draft seeded with the placeholder prompt
    pub fn create() -> Self {
        Self {
            prompt: DEFAULT_DRAFT_PROMPT.to_string(),
            remix_of: None,
        }
    }

    /// Draft seeded from an existing artifact's prompt
    pub fn remix(source: &VideoArtifact) -> Self {
        Self {
            prompt: source.description.clone(),
            remix_of: Some(source.clone()),
        }
    }

    pub fn is_remix(&self) -> bool {
        self.remix_of.is_some()
    }
}

/// What the session is doing right now. Exactly one variant is active;
/// the collection itself lives on the session and is read by accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryState {
    /// Startup: the store has not been read yet
    Loading,

    /// The daily batch is running; `status` is the current progress line
    DailyRefreshing { status: String },

    /// Idle over the gallery grid
    Browsing,

    /// One artifact open in the player
    Playing { id: String },

    /// Editing a draft. `from_player` restores the previous state on
    /// cancel: `Some(id)` returns to that player, `None` to the grid.
    Editing {
        draft: Draft,
        from_player: Option<String>,
    },

    /// A user-initiated generation is in flight
    Saving,

    /// A dismissible error is surfaced over the gallery
    Error { messages: Vec<String> },
}

impl GalleryState {
    pub fn label(&self) -> &'static str {
        match self {
            GalleryState::Loading => "loading",
            GalleryState::DailyRefreshing { .. } => "refreshing",
            GalleryState::Browsing => "browsing",
            GalleryState::Playing { .. } => "playing",
            GalleryState::Editing { .. } => "editing",
            GalleryState::Saving => "saving",
            GalleryState::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_draft_starts_from_placeholder() {
        let draft = Draft::create();
        assert_eq!(draft.prompt, DEFAULT_DRAFT_PROMPT);
        assert!(!draft.is_remix());
    }

    #[test]
    fn test_remix_draft_seeds_from_source_prompt() {
        let source = VideoArtifact::new(
            "Glass Tide".to_string(),
            "a wave in slow motion".to_string(),
            "https://example.com/wave.mp4".to_string(),
        );
        let draft = Draft::remix(&source);
        assert_eq!(draft.prompt, "a wave in slow motion");
        assert!(draft.is_remix());
        assert_eq!(draft.remix_of.unwrap().title, "Glass Tide");
    }
}
