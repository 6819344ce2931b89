use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Multipart, State};
use tracing::info;

use crate::error::ApiError;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{BoundaryImage, GenerateParams, GenerateResponse, GenerationSettings};
use crate::prompt;
use crate::state::AppState;

pub const MISSING_TOKEN_MESSAGE: &str =
    "Server not configured - missing REPLICATE_API_TOKEN in .env file";
pub const MISSING_IMAGE_MESSAGE: &str =
    "No boundary image uploaded. Please upload a PNG/SVG outline.";

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();
    info!("received generation request");

    // Credential check comes first, matching the original surface: a
    // request missing both token and image reports the 500.
    let gateway = state
        .gateway
        .as_ref()
        .ok_or_else(|| ApiError::Configuration(MISSING_TOKEN_MESSAGE.to_string()))?;

    let (image, params) = read_form(multipart).await?;
    let image = image
        .filter(|img| !img.bytes.is_empty())
        .ok_or_else(|| ApiError::Validation(MISSING_IMAGE_MESSAGE.to_string()))?;

    info!(
        file_size = image.bytes.len(),
        guidance_scale = ?params.guidance_scale,
        steps = ?params.steps,
        "parameters parsed"
    );

    let prompts = prompt::compose(params.prompt.as_deref(), params.negative_prompt.as_deref());
    info!("enhanced prompt: {}", prompts.positive);

    let settings = GenerationSettings::from_params(&params);
    let image_url = gateway.generate_fill(&prompts, &image, settings).await?;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    info!("generation successful");

    Ok(Json(GenerateResponse {
        success: true,
        image_url,
    }))
}

// Walks the multipart form: the first boundaryImage field wins, extra
// image fields and unknown fields are ignored.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(Option<BoundaryImage>, GenerateParams), ApiError> {
    let mut image: Option<BoundaryImage> = None;
    let mut params = GenerateParams::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("boundaryImage") => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Read error: {e}")))?
                    .to_vec();
                if image.is_none() {
                    image = Some(BoundaryImage { bytes, mime_type });
                }
            }
            Some("prompt") => params.prompt = Some(read_text(field).await?),
            Some("negativePrompt") => params.negative_prompt = Some(read_text(field).await?),
            Some("guidanceScale") => params.guidance_scale = Some(read_text(field).await?),
            Some("steps") => params.steps = Some(read_text(field).await?),
            Some("controlnetStrength") => {
                params.controlnet_strength = Some(read_text(field).await?)
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok((image, params))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("Read error: {e}")))
}
