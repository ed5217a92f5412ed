pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod figma;
pub mod io;
pub mod job;
pub mod link;
pub mod prettify;
pub mod render;
pub mod rubric;

pub use error::{FigrevError, Result};
