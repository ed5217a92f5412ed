use figrev_core::config::ReviewConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state passed to all route handlers.
///
/// The config lives behind an async `RwLock` and is replaced wholesale by
/// `/api/config`; review requests clone a snapshot, so a concurrent update
/// never produces a torn read.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<RwLock<Option<ReviewConfig>>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            config: Arc::new(RwLock::new(None)),
        }
    }
}
