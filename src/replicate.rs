use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::metrics::FALLBACK_TOTAL;
use crate::models::{BoundaryImage, GenerationSettings};
use crate::prompt::PromptSet;

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";

// stability-ai/stable-diffusion-xl, image-conditioned
pub const PRIMARY_MODEL_VERSION: &str =
    "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

// stability-ai/sdxl, img2img fallback
pub const FALLBACK_MODEL_VERSION: &str =
    "7762fd07cf82c948538e41f63f77d685e02b063e37e496e96eefd46c929f9bdc";

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs one model version against the predictions API and returns the raw
/// `output` value. A trait so tests can substitute a counting fake.
#[async_trait]
pub trait PredictionRunner: Send + Sync {
    async fn run(&self, version: &str, input: Value) -> Result<Value, ApiError>;
}

// HTTP client for the Replicate predictions API: create the prediction,
// then poll its `urls.get` endpoint until it settles.
pub struct ReplicateClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl ReplicateClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        ReplicateClient {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl PredictionRunner for ReplicateClient {
    async fn run(&self, version: &str, input: Value) -> Result<Value, ApiError> {
        let endpoint = format!("{}/predictions", self.api_base);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.token)
            .header("Prefer", "wait")
            .json(&json!({ "version": version, "input": input }))
            .send()
            .await
            .map_err(|e| ApiError::provider("Replicate request failed", e.to_string()))?;
        let mut prediction = json_or_error(response).await?;

        let started = Instant::now();
        loop {
            match prediction_status(&prediction).as_str() {
                "succeeded" => {
                    return Ok(prediction.get("output").cloned().unwrap_or(Value::Null));
                }
                "starting" | "processing" => {
                    if started.elapsed() >= POLL_TIMEOUT {
                        return Err(ApiError::provider(
                            "Replicate prediction timed out",
                            format!("no result after {}s", POLL_TIMEOUT.as_secs()),
                        ));
                    }
                    let poll_url = prediction
                        .get("urls")
                        .and_then(|urls| urls.get("get"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            ApiError::provider(
                                "Replicate prediction missing poll URL",
                                prediction.to_string(),
                            )
                        })?;
                    sleep(POLL_INTERVAL).await;
                    let response = self
                        .http
                        .get(&poll_url)
                        .bearer_auth(&self.token)
                        .send()
                        .await
                        .map_err(|e| {
                            ApiError::provider("Replicate poll request failed", e.to_string())
                        })?;
                    prediction = json_or_error(response).await?;
                }
                _ => {
                    return Err(ApiError::provider(
                        "Replicate prediction failed",
                        prediction.to_string(),
                    ));
                }
            }
        }
    }
}

fn prediction_status(prediction: &Value) -> String {
    prediction
        .get("status")
        .and_then(Value::as_str)
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

async fn json_or_error(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::provider("Replicate response unreadable", e.to_string()))?;
    if !status.is_success() {
        return Err(ApiError::provider(
            format!("Replicate API error ({})", status.as_u16()),
            body,
        ));
    }
    serde_json::from_str(&body)
        .map_err(|e| ApiError::provider("Replicate returned invalid JSON", e.to_string()))
}

/// Drives one generation: primary SDXL attempt, then a single img2img
/// fallback. No retries beyond that; the fallback's error is terminal.
pub struct InferenceGateway {
    runner: Arc<dyn PredictionRunner>,
}

impl InferenceGateway {
    pub fn new(runner: Arc<dyn PredictionRunner>) -> Self {
        InferenceGateway { runner }
    }

    pub fn replicate(api_base: &str, token: &str) -> Self {
        Self::new(Arc::new(ReplicateClient::new(api_base, token)))
    }

    pub async fn generate_fill(
        &self,
        prompts: &PromptSet,
        image: &BoundaryImage,
        settings: GenerationSettings,
    ) -> Result<String, ApiError> {
        let image_uri = to_data_uri(image);

        let primary_input = json!({
            "prompt": prompts.positive,
            "negative_prompt": prompts.negative,
            "image": image_uri,
            "width": 1024,
            "height": 1024,
            "guidance_scale": settings.guidance_scale,
            "num_inference_steps": settings.steps,
            "num_outputs": 1,
            "scheduler": "K_EULER",
        });

        let output = match self.runner.run(PRIMARY_MODEL_VERSION, primary_input).await {
            Ok(output) => {
                info!("SDXL generation successful");
                output
            }
            Err(primary_err) => {
                warn!("SDXL failed, trying fallback model: {primary_err}");
                FALLBACK_TOTAL.inc();

                let fallback_input = json!({
                    "prompt": prompts.positive,
                    "negative_prompt": prompts.negative_fallback,
                    "image": image_uri,
                    "strength": settings.strength,
                    "guidance_scale": settings.guidance_scale,
                    "num_inference_steps": settings.steps,
                    "num_outputs": 1,
                });
                self.runner.run(FALLBACK_MODEL_VERSION, fallback_input).await?
            }
        };

        first_image_url(&output)
    }
}

pub fn to_data_uri(image: &BoundaryImage) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        STANDARD.encode(&image.bytes)
    )
}

// Providers return either a single URL or an ordered list; take the first.
pub fn first_image_url(output: &Value) -> Result<String, ApiError> {
    let url = match output {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    url.ok_or_else(|| {
        ApiError::provider("Replicate response returned no image URLs", output.to_string())
    })
}
