use std::path::PathBuf;

/// Argv prefix of the packaged fallback runner, used when no local `gemini`
/// binary resolves or the local one fails.
pub const FALLBACK_RUNNER: [&str; 3] = ["npx", "-y", "@google/gemini-cli"];

/// Locate the Gemini CLI binary: `GEMINI_BIN` env override first, then a
/// PATH lookup. `None` means only the fallback runner is available.
pub fn resolve_gemini_binary() -> Option<PathBuf> {
    if let Ok(bin) = std::env::var("GEMINI_BIN") {
        if !bin.trim().is_empty() {
            return Some(PathBuf::from(bin));
        }
    }
    which::which("gemini").ok()
}
