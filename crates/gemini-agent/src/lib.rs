pub mod error;
pub mod resolve;
pub mod runner;

pub use error::{GeminiAgentError, Result};
pub use runner::GeminiRunner;
