use serde::Serialize;

// Text form fields that ride alongside the boundary image upload.
// All optional; numeric ones arrive as strings and are coerced later.
#[derive(Debug, Default, Clone)]
pub struct GenerateParams {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub guidance_scale: Option<String>,
    pub steps: Option<String>,
    pub controlnet_strength: Option<String>,
}

// Uploaded boundary image, held in memory for the duration of the request.
#[derive(Debug, Clone)]
pub struct BoundaryImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

pub const DEFAULT_GUIDANCE_SCALE: f64 = 15.0;
pub const DEFAULT_STEPS: u32 = 50;
pub const DEFAULT_STRENGTH: f64 = 0.8;

// Numeric generation parameters after coercion. Non-numeric or
// non-positive caller input falls back to the default rather than
// failing the request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub guidance_scale: f64,
    pub steps: u32,
    pub strength: f64,
}

impl GenerationSettings {
    pub fn from_params(params: &GenerateParams) -> Self {
        GenerationSettings {
            guidance_scale: coerce_f64(params.guidance_scale.as_deref(), DEFAULT_GUIDANCE_SCALE),
            steps: coerce_u32(params.steps.as_deref(), DEFAULT_STEPS),
            strength: coerce_f64(params.controlnet_strength.as_deref(), DEFAULT_STRENGTH),
        }
    }
}

fn coerce_f64(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn coerce_u32(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

// Success envelope for /api/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        guidance: Option<&str>,
        steps: Option<&str>,
        strength: Option<&str>,
    ) -> GenerateParams {
        GenerateParams {
            guidance_scale: guidance.map(str::to_string),
            steps: steps.map(str::to_string),
            controlnet_strength: strength.map(str::to_string),
            ..GenerateParams::default()
        }
    }

    #[test]
    fn non_numeric_input_falls_back_to_defaults() {
        let settings = GenerationSettings::from_params(&params(Some("abc"), Some("abc"), None));
        assert_eq!(settings.guidance_scale, DEFAULT_GUIDANCE_SCALE);
        assert_eq!(settings.steps, DEFAULT_STEPS);
        assert_eq!(settings.strength, DEFAULT_STRENGTH);
    }

    #[test]
    fn numeric_input_is_passed_through() {
        let settings =
            GenerationSettings::from_params(&params(Some("20"), Some("10"), Some("0.5")));
        assert_eq!(settings.guidance_scale, 20.0);
        assert_eq!(settings.steps, 10);
        assert_eq!(settings.strength, 0.5);
    }

    #[test]
    fn absent_input_uses_defaults() {
        let settings = GenerationSettings::from_params(&GenerateParams::default());
        assert_eq!(settings.guidance_scale, 15.0);
        assert_eq!(settings.steps, 50);
        assert_eq!(settings.strength, 0.8);
    }

    #[test]
    fn zero_and_negative_values_fall_back() {
        let settings = GenerationSettings::from_params(&params(Some("0"), Some("0"), Some("-1")));
        assert_eq!(settings.guidance_scale, DEFAULT_GUIDANCE_SCALE);
        assert_eq!(settings.steps, DEFAULT_STEPS);
        assert_eq!(settings.strength, DEFAULT_STRENGTH);
    }
}
