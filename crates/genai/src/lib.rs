/// Video and text generation against the Gemini API
///
/// Provides the backend traits, the Veo/Gemini HTTP implementations, a
/// fixed-interval job poller, and the pipeline that turns prompts into
/// finished gallery artifacts.
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod backend;
pub use backend::*;

pub mod gemini;
pub use gemini::{GeminiText, GeminiVideo};

pub mod mock;
pub use mock::{MockJobOutcome, MockTextGenerator, MockTextOutcome, MockVideoGenerator};

mod poller;
pub use poller::*;

mod pipeline;
pub use pipeline::*;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Video generation model
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.0-generate-preview";

/// Title and prompt-idea generation model
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GenError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("generation finished with no results")]
    EmptyResult,

    #[error("payload transfer failed: {0}")]
    Transfer(String),

    #[error("generation job failed: {0}")]
    JobFailed(String),

    #[error("prompt generation returned no usable prompts")]
    EmptyPrompts,

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl GenError {
    pub fn transfer(msg: impl Into<String>) -> Self {
        GenError::Transfer(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        GenError::InvalidResponse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

/// Connection settings shared by the Gemini backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Service base URL
    pub base_url: String,

    /// Video generation model
    pub video_model: String,

    /// Text generation model
    pub text_model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl GenAiConfig {
    /// Config pointed at the public Gemini endpoint with default models
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }

    /// With service base URL
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// With video model
    pub fn with_video_model(mut self, model: String) -> Self {
        self.video_model = model;
        self
    }

    /// With text model
    pub fn with_text_model(mut self, model: String) -> Self {
        self.text_model = model;
        self
    }

    /// With per-request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
