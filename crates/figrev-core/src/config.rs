use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_INPUT_CHAR_LIMIT: usize = 120_000;

/// Credentials and prompt for one review session.
///
/// Replaced wholesale on every `/api/config` call; the pipeline receives a
/// cloned snapshot per request, so an update mid-request never tears a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub figma_pat: String,
    pub gemini_api_key: String,
    pub prompt: String,
    pub model: String,
    pub input_char_limit: usize,
}

impl ReviewConfig {
    pub fn new(
        figma_pat: impl Into<String>,
        gemini_api_key: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            figma_pat: figma_pat.into().trim().to_string(),
            gemini_api_key: gemini_api_key.into().trim().to_string(),
            prompt: prompt.into(),
            model: default_model(),
            input_char_limit: default_input_char_limit(),
        }
    }
}

/// `GEMINI_MODEL` env override, else [`DEFAULT_MODEL`].
pub fn default_model() -> String {
    std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

/// `INPUT_CHAR_LIMIT` env override, else [`DEFAULT_INPUT_CHAR_LIMIT`].
pub fn default_input_char_limit() -> usize {
    std::env::var("INPUT_CHAR_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INPUT_CHAR_LIMIT)
}
