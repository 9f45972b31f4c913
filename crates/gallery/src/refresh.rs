/// Once-per-day gallery refresh policy
use chrono::{DateTime, TimeZone, Utc};
use genai::PromptPipeline;
use store::VideoArtifact;
use tracing::{error, info};

/// True when the daily batch should run: the marker is absent, or its
/// calendar date in the observer's zone differs from `now`'s.
///
/// This is a date-boundary comparison, not an elapsed-duration one: two
/// calls minutes apart but crossing midnight are due, twenty hours
/// apart on the same day is not.
pub fn refresh_due<Tz: TimeZone>(marker: Option<DateTime<Utc>>, now: DateTime<Tz>) -> bool {
    match marker {
        Some(last) => last.with_timezone(&now.timezone()).date_naive() != now.date_naive(),
        None => true,
    }
}

/// Runs one daily batch: ask the text backend for prompt ideas, then
/// generate a video per idea
pub struct DailyRefresh {
    pub prompts_per_day: usize,
}

impl Default for DailyRefresh {
    fn default() -> Self {
        Self { prompts_per_day: 3 }
    }
}

impl DailyRefresh {
    pub fn new(prompts_per_day: usize) -> Self {
        Self { prompts_per_day }
    }

    /// Generate today's batch, reporting progress lines through `status`.
    ///
    /// Returns whatever subset succeeded. Prompt-idea failure fails the
    /// whole batch and returns an empty list, so the caller keeps showing
    /// the cached gallery.
    pub async fn run<F>(&self, pipeline: &PromptPipeline, mut status: F) -> Vec<VideoArtifact>
    where
        F: FnMut(String),
    {
        status("Dreaming up new video ideas...".to_string());
        let prompts = match pipeline.suggest_prompts(self.prompts_per_day).await {
            Ok(prompts) => prompts,
            Err(err) => {
                error!("daily prompt ideas failed: {err}");
                return Vec::new();
            }
        };

        let total = prompts.len();
        let report = pipeline
            .create_batch(&prompts, |index, prompt| {
                let preview: String = prompt.chars().take(50).collect();
                status(format!(
                    "Generating video {} of {}: \"{preview}...\"",
                    index + 1,
                    total
                ));
            })
            .await;
        if !report.failures.is_empty() {
            info!(
                "daily batch finished: {} generated, {} skipped",
                report.generated.len(),
                report.failures.len()
            );
        }
        report.generated
    }
}
