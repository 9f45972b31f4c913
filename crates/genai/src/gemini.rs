/// Gemini REST backends for video (Veo long-running operations) and text
use crate::{
    GenAiConfig, GenError, JobHandle, JobState, Result, TextGenerator, TextRequest, VideoGenerator,
    VideoRef,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Veo video generation over `predictLongRunning` operations
pub struct GeminiVideo {
    config: GenAiConfig,
    client: reqwest::Client,
}

impl GeminiVideo {
    pub fn new(config: GenAiConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl VideoGenerator for GeminiVideo {
    fn name(&self) -> &str {
        "gemini-veo"
    }

    async fn submit(&self, prompt: &str, count: u32) -> Result<JobHandle> {
        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.config.base_url.trim_end_matches('/'),
            self.config.video_model.trim()
        );
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": count,
                "aspectRatio": "16:9",
            }
        });

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", self.config.api_key.trim())
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let operation: OperationRef = response.json().await?;
        if operation.name.is_empty() {
            return Err(GenError::invalid_response(
                "submit returned an unnamed operation",
            ));
        }
        debug!("submitted video job {}", operation.name);

        Ok(JobHandle {
            id: operation.name,
            prompt: prompt.to_string(),
        })
    }

    async fn poll(&self, job: &JobHandle) -> Result<JobState> {
        let url = format!(
            "{}/v1beta/{}",
            self.config.base_url.trim_end_matches('/'),
            job.id
        );
        let response = self
            .client
            .get(&url)
            .header("X-Goog-Api-Key", self.config.api_key.trim())
            .send()
            .await?;
        let response = check_status(response).await?;

        let operation: Operation = response.json().await?;
        if !operation.done {
            return Ok(JobState::Pending);
        }
        if let Some(error) = operation.error {
            return Ok(JobState::Failed(error.message));
        }
        Ok(JobState::Done(collect_refs(operation.response)))
    }

    async fn fetch(&self, video: &VideoRef) -> Result<String> {
        // The file endpoint takes the key as a query parameter.
        let separator = if video.0.contains('?') { '&' } else { '?' };
        let url = format!("{}{}key={}", video.0, separator, self.config.api_key.trim());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GenError::transfer(format!("download failed: {err}")))?;
        if !response.status().is_success() {
            return Err(GenError::transfer(format!(
                "download failed with status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GenError::transfer(format!("download interrupted: {err}")))?;

        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:video/mp4;base64,{encoded}"))
    }
}

/// Text generation over `generateContent`, optionally schema-constrained
pub struct GeminiText {
    config: GenAiConfig,
    client: reqwest::Client,
}

impl GeminiText {
    pub fn new(config: GenAiConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiText {
    fn name(&self) -> &str {
        "gemini-text"
    }

    async fn generate(&self, request: TextRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.text_model.trim()
        );
        let mut payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        });
        if let Some(schema) = request.response_schema {
            payload["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", self.config.api_key.trim())
            .json(&payload)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: GenerateContentResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenError::invalid_response("response had no candidates"))?;
        let text = candidate
            .content
            .and_then(|c| c.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(GenError::invalid_response("response contained no text"));
        }
        Ok(text)
    }
}

fn build_client(config: &GenAiConfig) -> Result<reqwest::Client> {
    if config.api_key.trim().is_empty() {
        return Err(GenError::Configuration(
            "Gemini API key is required.".to_string(),
        ));
    }
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GenError::Api {
        status: status.as_u16(),
        message,
    })
}

fn collect_refs(response: Option<OperationResponse>) -> Vec<VideoRef> {
    response
        .and_then(|r| r.generate_video_response)
        .map(|g| g.generated_samples)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.video.and_then(|v| v.uri))
        .map(VideoRef)
        .collect()
}

#[derive(Debug, Deserialize)]
struct OperationRef {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResponse>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[allow(dead_code)]
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct OperationResponse {
    #[serde(default, rename = "generateVideoResponse")]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
struct GenerateVideoResponse {
    #[serde(default, rename = "generatedSamples")]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<SampleVideo>,
}

#[derive(Debug, Deserialize)]
struct SampleVideo {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ContentCandidate>,
}

#[derive(Debug, Deserialize)]
struct ContentCandidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[allow(dead_code)]
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_backend_requires_api_key() {
        let config = GenAiConfig::new(String::new());
        assert!(matches!(
            GeminiVideo::new(config),
            Err(GenError::Configuration(_))
        ));
    }

    #[test]
    fn test_pending_operation_parses() {
        let operation: Operation = serde_json::from_str(r#"{"name": "operations/abc"}"#).unwrap();
        assert!(!operation.done);
        assert!(operation.response.is_none());
        assert!(operation.error.is_none());
    }

    #[test]
    fn test_finished_operation_yields_result_refs() {
        let raw = r#"{
            "name": "operations/abc",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://files.example/one.mp4?alt=media"}},
                        {"video": {"uri": "https://files.example/two.mp4?alt=media"}}
                    ]
                }
            }
        }"#;
        let operation: Operation = serde_json::from_str(raw).unwrap();
        let refs = collect_refs(operation.response);
        assert_eq!(
            refs,
            vec![
                VideoRef("https://files.example/one.mp4?alt=media".to_string()),
                VideoRef("https://files.example/two.mp4?alt=media".to_string()),
            ]
        );
    }

    #[test]
    fn test_operation_error_parses() {
        let raw = r#"{"name": "operations/abc", "done": true, "error": {"code": 8, "message": "quota exhausted"}}"#;
        let operation: Operation = serde_json::from_str(raw).unwrap();
        assert_eq!(operation.error.unwrap().message, "quota exhausted");
    }

    #[test]
    fn test_done_without_samples_yields_no_refs() {
        let raw = r#"{"name": "operations/abc", "done": true, "response": {}}"#;
        let operation: Operation = serde_json::from_str(raw).unwrap();
        assert!(collect_refs(operation.response).is_empty());
    }
}
