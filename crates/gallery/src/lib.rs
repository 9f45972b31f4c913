/// Gallery orchestration: the session state machine that owns the video
/// collection, the once-per-day refresh policy, and the user-facing
/// error copy. The presentation layer renders `GalleryState` and feeds
/// user intents back in as triggers; this crate is the only writer of
/// the persisted collection after the initial load.
use thiserror::Error;

mod state;
pub use state::*;

mod refresh;
pub use refresh::*;

mod messages;

mod session;
pub use session::*;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("{trigger} is not available while {state}")]
    InvalidTrigger {
        trigger: &'static str,
        state: &'static str,
    },
    #[error("no artifact with id {0}")]
    UnknownArtifact(String),
    #[error("prompt is empty")]
    EmptyPrompt,
}

pub type Result<T> = std::result::Result<T, GalleryError>;
