use thiserror::Error;

#[derive(Debug, Error)]
pub enum FigrevError {
    #[error("config not set. call /api/config first.")]
    ConfigMissing,

    #[error("invalid Figma link or fileKey: {0}")]
    InvalidLink(String),

    #[error("Figma API error: {status} {status_text} - {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("unexpected Figma response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FigrevError>;
