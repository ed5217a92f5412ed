use axum::extract::State;
use axum::Json;
use figrev_core::config::ReviewConfig;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBody {
    #[serde(default)]
    figma_pat: Option<String>,
    #[serde(default)]
    gemini_api_key: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    input_char_limit: Option<usize>,
}

/// POST /api/config — replace the review configuration wholesale.
///
/// `figmaPat`, `geminiApiKey` and `prompt` are required; `model` and
/// `inputCharLimit` fall back to env-derived defaults when absent.
pub async fn set_config(
    State(app): State<AppState>,
    Json(body): Json<ConfigBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let figma_pat = body.figma_pat.as_deref().map(str::trim).unwrap_or("");
    let gemini_api_key = body.gemini_api_key.as_deref().map(str::trim).unwrap_or("");
    let prompt = body.prompt.as_deref().unwrap_or("");

    if figma_pat.is_empty() || gemini_api_key.is_empty() || prompt.is_empty() {
        return Err(AppError::bad_request(
            "FIGMA_PAT, GEMINI_API_KEY, prompt are required",
        ));
    }

    let mut config = ReviewConfig::new(figma_pat, gemini_api_key, prompt);
    if let Some(model) = body.model.filter(|m| !m.trim().is_empty()) {
        config.model = model;
    }
    if let Some(limit) = body.input_char_limit.filter(|l| *l > 0) {
        config.input_char_limit = limit;
    }

    let response = serde_json::json!({
        "ok": true,
        "model": config.model.clone(),
        "inputCharLimit": config.input_char_limit,
    });

    tracing::info!(model = %config.model, "review config updated");
    *app.config.write().await = Some(config);

    Ok(Json(response))
}
