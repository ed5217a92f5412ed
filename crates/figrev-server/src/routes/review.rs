use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use figrev_core::extract::extract_markdown;
use figrev_core::figma::FigmaClient;
use figrev_core::job::{JobPaths, DEFAULT_JOB_RETENTION};
use figrev_core::link::parse_figma_link;
use figrev_core::prettify::prettify_markdown;
use figrev_core::render::markdown_to_html;
use figrev_core::rubric::{compose_prompt, DEFAULT_RUBRIC};
use figrev_core::FigrevError;
use gemini_agent::GeminiRunner;

use crate::error::AppError;
use crate::state::AppState;

/// Wall-clock budget for one Gemini invocation.
const GEMINI_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
pub struct ReviewBody {
    #[serde(default)]
    link: Option<String>,
}

/// POST /api/review — run the full pipeline for one Figma link.
///
/// Figma fetch → markdown extraction → prompt composition → Gemini CLI →
/// post-processing → `{ok, markdown, html, meta}`. Requires `/api/config`
/// to have been called first.
pub async fn post_review(
    State(app): State<AppState>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(config) = app.config.read().await.clone() else {
        return Err(FigrevError::ConfigMissing.into());
    };

    let link = body
        .link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| AppError::bad_request("link is required"))?
        .to_string();

    let parsed = parse_figma_link(&link);
    let file_key = parsed
        .file_key
        .ok_or_else(|| FigrevError::InvalidLink(link.clone()))?;

    let job = JobPaths::create(&app.data_dir, &config.figma_pat, DEFAULT_JOB_RETENTION)?;
    tracing::info!(uid = %job.uid, job_id = %job.job_id, %file_key, "starting review job");

    // 1) Figma -> annotated markdown
    let client = FigmaClient::new(&config.figma_pat)?;
    let file = client.fetch_file(&file_key).await?;
    let markdown = extract_markdown(&file_key, file.pages()?);
    figrev_core::io::atomic_write(&job.md_path, markdown.as_bytes())?;

    // 2) Compose prompt from user template + rubric
    let prompt = compose_prompt(&config.prompt, &DEFAULT_RUBRIC);

    // 3) Gemini CLI over stdin
    let mut runner = GeminiRunner::new(config.model.as_str(), prompt.as_str());
    runner.input_char_limit = config.input_char_limit;
    runner.telemetry_path = job.telemetry_path.clone();
    runner.timeout = GEMINI_TIMEOUT;
    runner.env = vec![("GEMINI_API_KEY".to_string(), config.gemini_api_key.clone())];
    let review = runner.run(&markdown).await?;
    figrev_core::io::atomic_write(&job.review_path, format!("{review}\n").as_bytes())?;

    // 4) Post-process and render
    let review = tokio::fs::read_to_string(&job.review_path).await?;
    let pretty = prettify_markdown(&review);
    let html = markdown_to_html(&pretty);

    tracing::info!(job_id = %job.job_id, "review job finished");

    Ok(Json(serde_json::json!({
        "ok": true,
        "markdown": pretty,
        "html": html,
        "meta": {
            "model": config.model,
            "inputCharLimit": config.input_char_limit,
        },
    })))
}
