use crate::document::FigmaFile;
use crate::error::{FigrevError, Result};
use std::time::Duration;

pub const FIGMA_API_BASE: &str = "https://api.figma.com/v1";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client for the Figma REST API, authenticated via `X-Figma-Token`.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl FigmaClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, FIGMA_API_BASE)
    }

    /// Construct against a non-default API base. Test seam for mockito.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Fetch a file's document tree by file key.
    ///
    /// Non-2xx responses surface as [`FigrevError::Api`] carrying the status
    /// and body text.
    pub async fn fetch_file(&self, file_key: &str) -> Result<FigmaFile> {
        let url = format!("{}/files/{}", self.base_url, file_key);
        tracing::debug!(%url, "fetching Figma file");

        let res = self
            .http
            .get(&url)
            .header("X-Figma-Token", &self.token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(FigrevError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        let file: FigmaFile = res.json().await?;
        Ok(file)
    }
}
