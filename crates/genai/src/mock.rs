/// Scriptable in-memory backends for tests and offline runs
use crate::{
    GenError, JobHandle, JobState, Result, TextGenerator, TextRequest, VideoGenerator, VideoRef,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Outcome the video mock assigns to the next submitted job
#[derive(Debug, Clone)]
pub enum MockJobOutcome {
    /// Job completes with these payloads
    Payloads(Vec<String>),
    /// Job completes with no results
    Empty,
    /// Job finishes unsuccessfully
    Failure(String),
    /// Results resolve but every payload fetch fails
    Unfetchable,
    /// Submission itself is rejected with an API error
    RejectSubmit { status: u16, message: String },
}

pub struct MockVideoGenerator {
    state: Mutex<VideoState>,
    pending_polls: usize,
}

#[derive(Default)]
struct VideoState {
    script: VecDeque<MockJobOutcome>,
    jobs: HashMap<String, ScriptedJob>,
    payloads: HashMap<String, String>,
    next_job: usize,
    submit_calls: usize,
    poll_calls: usize,
    fetch_calls: usize,
}

struct ScriptedJob {
    outcome: MockJobOutcome,
    polls_left: usize,
}

impl MockVideoGenerator {
    /// Every job succeeds with a payload derived from its prompt
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// Jobs consume the script in submission order; once exhausted they
    /// fall back to succeeding
    pub fn with_script(script: Vec<MockJobOutcome>) -> Self {
        Self {
            state: Mutex::new(VideoState {
                script: VecDeque::from(script),
                ..Default::default()
            }),
            pending_polls: 0,
        }
    }

    /// Keep each job pending for this many polls before it resolves
    pub fn with_pending_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.state.lock().unwrap().submit_calls
    }

    pub fn poll_calls(&self) -> usize {
        self.state.lock().unwrap().poll_calls
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }
}

impl Default for MockVideoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VideoGenerator for MockVideoGenerator {
    fn name(&self) -> &str {
        "mock-video"
    }

    async fn submit(&self, prompt: &str, _count: u32) -> Result<JobHandle> {
        let mut state = self.state.lock().unwrap();
        state.submit_calls += 1;

        let outcome = state
            .script
            .pop_front()
            .unwrap_or_else(|| MockJobOutcome::Payloads(vec![format!("mock://video/{prompt}")]));
        if let MockJobOutcome::RejectSubmit { status, message } = outcome {
            return Err(GenError::Api { status, message });
        }

        state.next_job += 1;
        let id = format!("operations/mock-{}", state.next_job);
        state.jobs.insert(
            id.clone(),
            ScriptedJob {
                outcome,
                polls_left: self.pending_polls,
            },
        );
        Ok(JobHandle {
            id,
            prompt: prompt.to_string(),
        })
    }

    async fn poll(&self, job: &JobHandle) -> Result<JobState> {
        let mut state = self.state.lock().unwrap();
        state.poll_calls += 1;

        let Some(mut scripted) = state.jobs.remove(&job.id) else {
            return Err(GenError::invalid_response(format!("unknown job {}", job.id)));
        };
        if scripted.polls_left > 0 {
            scripted.polls_left -= 1;
            state.jobs.insert(job.id.clone(), scripted);
            return Ok(JobState::Pending);
        }

        match scripted.outcome {
            MockJobOutcome::Payloads(payloads) => {
                let mut refs = Vec::with_capacity(payloads.len());
                for (index, payload) in payloads.into_iter().enumerate() {
                    let video = VideoRef(format!("{}/result/{}", job.id, index));
                    state.payloads.insert(video.0.clone(), payload);
                    refs.push(video);
                }
                Ok(JobState::Done(refs))
            }
            MockJobOutcome::Empty => Ok(JobState::Done(Vec::new())),
            MockJobOutcome::Failure(message) => Ok(JobState::Failed(message)),
            MockJobOutcome::Unfetchable => Ok(JobState::Done(vec![VideoRef(format!(
                "{}/unfetchable",
                job.id
            ))])),
            MockJobOutcome::RejectSubmit { message, .. } => Ok(JobState::Failed(message)),
        }
    }

    async fn fetch(&self, video: &VideoRef) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        state
            .payloads
            .get(&video.0)
            .cloned()
            .ok_or_else(|| GenError::transfer(format!("nothing behind {}", video.0)))
    }
}

/// Outcome for one text call
#[derive(Debug, Clone)]
pub enum MockTextOutcome {
    Text(String),
    Fail(String),
}

pub struct MockTextGenerator {
    state: Mutex<TextState>,
}

#[derive(Default)]
struct TextState {
    script: VecDeque<MockTextOutcome>,
    requests: Vec<TextRequest>,
    calls: usize,
}

impl MockTextGenerator {
    /// Every call succeeds by echoing its prompt
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    /// Calls consume the script in order; once exhausted they fall back
    /// to echoing
    pub fn with_script(script: Vec<MockTextOutcome>) -> Self {
        Self {
            state: Mutex::new(TextState {
                script: VecDeque::from(script),
                ..Default::default()
            }),
        }
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<TextRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    fn name(&self) -> &str {
        "mock-text"
    }

    async fn generate(&self, request: TextRequest) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;

        let fallback = format!("Mock response to: {}", request.prompt);
        state.requests.push(request);

        match state.script.pop_front() {
            Some(MockTextOutcome::Text(text)) => Ok(text),
            Some(MockTextOutcome::Fail(message)) => Err(GenError::Api {
                status: 500,
                message,
            }),
            None => Ok(fallback),
        }
    }
}
