use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiAgentError {
    #[error("npx @google/gemini-cli failed:\n{0}")]
    FallbackFailed(String),

    #[error("gemini failed and npx fallback also failed:\n--- gemini ---\n{primary}\n--- npx ---\n{fallback}")]
    BothFailed { primary: String, fallback: String },

    #[error("empty Gemini output. Check GEMINI_API_KEY and network. See telemetry.log for details.")]
    EmptyOutput,

    #[error("gemini invocation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, GeminiAgentError>;
