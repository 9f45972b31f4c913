/// Fixed-interval polling that drives one generation job to completion
use crate::{GenError, JobHandle, JobState, Result, VideoGenerator};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Re-check cadence between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Wraps a video backend with submit-then-wait orchestration
pub struct JobPoller {
    backend: Arc<dyn VideoGenerator>,
    poll_interval: Duration,
}

impl JobPoller {
    pub fn new(backend: Arc<dyn VideoGenerator>) -> Self {
        Self {
            backend,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// With a re-check cadence other than the default (tests use a short one)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start one generation request for `count` videos
    pub async fn submit(&self, prompt: &str, count: u32) -> Result<JobHandle> {
        self.backend.submit(prompt, count).await
    }

    /// Suspend until the job leaves `Pending`, then fetch every result
    /// payload.
    ///
    /// Polls are strictly sequential: the next status check starts only
    /// after the previous one returned and the interval elapsed. A job
    /// that completes with zero results is an error, never an empty list.
    pub async fn await_completion(&self, job: &JobHandle) -> Result<Vec<String>> {
        let refs = loop {
            match self.backend.poll(job).await? {
                JobState::Pending => {
                    debug!("job {} still pending", job.id);
                    tokio::time::sleep(self.poll_interval).await;
                }
                JobState::Done(refs) => break refs,
                JobState::Failed(message) => return Err(GenError::JobFailed(message)),
            }
        };

        if refs.is_empty() {
            return Err(GenError::EmptyResult);
        }

        let mut payloads = Vec::with_capacity(refs.len());
        for video in &refs {
            payloads.push(self.backend.fetch(video).await?);
        }
        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockJobOutcome, MockVideoGenerator};

    fn make_poller(backend: Arc<MockVideoGenerator>) -> JobPoller {
        JobPoller::new(backend).with_poll_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_polls_until_done_then_fetches() {
        let backend = Arc::new(
            MockVideoGenerator::with_script(vec![MockJobOutcome::Payloads(vec![
                "data:video/mp4;base64,AAAA".to_string(),
            ])])
            .with_pending_polls(2),
        );
        let poller = make_poller(backend.clone());

        let job = poller.submit("a lighthouse in fog", 1).await.unwrap();
        let payloads = poller.await_completion(&job).await.unwrap();

        assert_eq!(payloads, vec!["data:video/mp4;base64,AAAA".to_string()]);
        assert_eq!(backend.poll_calls(), 3);
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_done_with_zero_results_is_empty_result() {
        let backend = Arc::new(MockVideoGenerator::with_script(vec![MockJobOutcome::Empty]));
        let poller = make_poller(backend);

        let job = poller.submit("anything", 1).await.unwrap();
        let err = poller.await_completion(&job).await.unwrap_err();
        assert!(matches!(err, GenError::EmptyResult));
    }

    #[tokio::test]
    async fn test_failed_job_carries_backend_message() {
        let backend = Arc::new(MockVideoGenerator::with_script(vec![
            MockJobOutcome::Failure("safety filters rejected the prompt".to_string()),
        ]));
        let poller = make_poller(backend);

        let job = poller.submit("anything", 1).await.unwrap();
        let err = poller.await_completion(&job).await.unwrap_err();
        match err {
            GenError::JobFailed(message) => {
                assert!(message.contains("safety filters"));
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unfetchable_payload_is_transfer_error() {
        let backend = Arc::new(MockVideoGenerator::with_script(vec![
            MockJobOutcome::Unfetchable,
        ]));
        let poller = make_poller(backend);

        let job = poller.submit("anything", 1).await.unwrap();
        let err = poller.await_completion(&job).await.unwrap_err();
        assert!(matches!(err, GenError::Transfer(_)));
    }

    #[tokio::test]
    async fn test_multiple_results_keep_order() {
        let backend = Arc::new(MockVideoGenerator::with_script(vec![
            MockJobOutcome::Payloads(vec!["first".to_string(), "second".to_string()]),
        ]));
        let poller = make_poller(backend);

        let job = poller.submit("two takes", 2).await.unwrap();
        let payloads = poller.await_completion(&job).await.unwrap();
        assert_eq!(payloads, vec!["first".to_string(), "second".to_string()]);
    }
}
