/// Generation backend abstraction
///
/// Two narrow interfaces: one for the long-running video jobs and one for
/// plain text calls (titles, prompt ideas). Both are object safe so the
/// poller and pipeline can hold them behind `Arc<dyn ...>`.
use crate::Result;

/// Handle to one in-flight generation job
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Server-side operation name
    pub id: String,

    /// Prompt the job was started from
    pub prompt: String,
}

/// Opaque reference to one generated video, resolvable to binary data
/// with the API credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef(pub String);

/// Polled status of a job
#[derive(Debug, Clone)]
pub enum JobState {
    /// Still running
    Pending,
    /// Finished; result references may be empty
    Done(Vec<VideoRef>),
    /// Finished unsuccessfully
    Failed(String),
}

/// One text-generation request
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub prompt: String,

    /// When set, the backend must answer with JSON matching this schema
    pub response_schema: Option<serde_json::Value>,
}

impl TextRequest {
    /// Free-text request
    pub fn text(prompt: String) -> Self {
        Self {
            prompt,
            response_schema: None,
        }
    }

    /// Schema-constrained JSON request
    pub fn json(prompt: String, schema: serde_json::Value) -> Self {
        Self {
            prompt,
            response_schema: Some(schema),
        }
    }
}

/// Backend that renders prompts into videos asynchronously
#[async_trait::async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Start one generation request for `count` videos
    async fn submit(&self, prompt: &str, count: u32) -> Result<JobHandle>;

    /// Check job status without waiting
    async fn poll(&self, job: &JobHandle) -> Result<JobState>;

    /// Resolve one result reference to an inline data-URL payload
    async fn fetch(&self, video: &VideoRef) -> Result<String>;
}

/// Backend for title and prompt-idea generation
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Run one request to completion and return the response text
    async fn generate(&self, request: TextRequest) -> Result<String>;
}
