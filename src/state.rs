use crate::replicate::InferenceGateway;

// App's shared state. Read-only after startup; `gateway` is None when no
// provider credential was configured, which degrades /api/generate only.
pub struct AppState {
    pub gateway: Option<InferenceGateway>,
}

impl AppState {
    pub fn new(api_base: &str, token: Option<String>) -> Self {
        AppState {
            gateway: token.map(|token| InferenceGateway::replicate(api_base, &token)),
        }
    }

    pub fn has_token(&self) -> bool {
        self.gateway.is_some()
    }
}
