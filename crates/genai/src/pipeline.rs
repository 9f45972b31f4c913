/// Turns natural-language prompts into finished gallery artifacts
use crate::{GenError, JobPoller, Result, TextGenerator, TextRequest};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use store::VideoArtifact;
use tracing::{info, warn};

/// Outcome of a sequential batch: the artifacts that succeeded plus one
/// entry per prompt that did not
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<VideoArtifact>,
    pub failures: Vec<(String, GenError)>,
}

/// Composes the job poller with a text backend for titles and prompt ideas
pub struct PromptPipeline {
    poller: JobPoller,
    text: Arc<dyn TextGenerator>,
}

impl PromptPipeline {
    pub fn new(poller: JobPoller, text: Arc<dyn TextGenerator>) -> Self {
        Self { poller, text }
    }

    /// Generate one video from `prompt` and give it an auto-generated title.
    ///
    /// Errors from the generation or the title call propagate to the
    /// caller, which decides the fallback.
    pub async fn create_from_prompt(&self, prompt: &str) -> Result<VideoArtifact> {
        let payload = self.generate_payload(prompt).await?;
        let title = self.suggest_title(prompt).await?;
        Ok(VideoArtifact::new(title, prompt.to_string(), payload))
    }

    /// Generate one video from `prompt` titled by the caller. Remixes use
    /// this to reuse the source title without a text call.
    pub async fn create_with_title(&self, prompt: &str, title: String) -> Result<VideoArtifact> {
        let payload = self.generate_payload(prompt).await?;
        Ok(VideoArtifact::new(title, prompt.to_string(), payload))
    }

    /// Generate a batch sequentially, one prompt at a time.
    ///
    /// A failing prompt is recorded and skipped; the batch carries on and
    /// returns whatever subset succeeded, in the original relative order.
    /// `progress` runs before each prompt with its index.
    pub async fn create_batch<F>(&self, prompts: &[String], mut progress: F) -> BatchReport
    where
        F: FnMut(usize, &str),
    {
        let mut report = BatchReport::default();
        for (index, prompt) in prompts.iter().enumerate() {
            progress(index, prompt);
            match self.create_from_prompt(prompt).await {
                Ok(artifact) => {
                    info!("generated \"{}\" ({} of {})", artifact.title, index + 1, prompts.len());
                    report.generated.push(artifact);
                }
                Err(err) => {
                    warn!("prompt {} of {} failed: {}", index + 1, prompts.len(), err);
                    report.failures.push((prompt.clone(), err));
                }
            }
        }
        report
    }

    /// Ask the text backend for `count` diverse short-video prompts
    pub async fn suggest_prompts(&self, count: usize) -> Result<Vec<String>> {
        let request = TextRequest::json(
            format!(
                "Generate {count} diverse, creative, and visually interesting prompts for \
                 short, 5-10 second videos. The prompts should be suitable for a \
                 text-to-video AI model. Return the response as a JSON object with a single \
                 key \"prompts\" that holds an array of {count} strings."
            ),
            json!({
                "type": "object",
                "properties": {
                    "prompts": {
                        "type": "array",
                        "description": format!("An array of {count} video prompt strings."),
                        "items": { "type": "string" },
                    }
                },
            }),
        );
        let raw = self.text.generate(request).await?;
        let ideas: PromptIdeas = serde_json::from_str(raw.trim())
            .map_err(|err| GenError::invalid_response(format!("prompt list was not JSON: {err}")))?;

        let prompts: Vec<String> = ideas
            .prompts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .take(count)
            .collect();
        if prompts.is_empty() {
            return Err(GenError::EmptyPrompts);
        }
        Ok(prompts)
    }

    async fn generate_payload(&self, prompt: &str) -> Result<String> {
        let job = self.poller.submit(prompt, 1).await?;
        let mut payloads = self.poller.await_completion(&job).await?;
        // await_completion guarantees at least one payload.
        Ok(payloads.remove(0))
    }

    async fn suggest_title(&self, prompt: &str) -> Result<String> {
        let request = TextRequest::text(format!(
            "Generate a short, captivating title (5-7 words) for a video based on this \
             prompt: \"{prompt}\". Do not include quotes in your response."
        ));
        let title = self.text.generate(request).await?;
        Ok(title.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct PromptIdeas {
    #[serde(default)]
    prompts: Vec<String>,
}
