use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::resolve::{resolve_gemini_binary, FALLBACK_RUNNER};
use crate::{GeminiAgentError, Result};

// ─── GeminiRunner ─────────────────────────────────────────────────────────

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_INPUT_CHAR_LIMIT: usize = 120_000;

/// One-shot invocation of the Gemini CLI.
///
/// The subject text goes in via stdin (truncated to `input_char_limit`
/// characters), the prompt and model as arguments. The primary binary is
/// tried first; on failure the packaged `npx` runner is used, and if both
/// fail the error aggregates both diagnostics. Each invocation runs under
/// `timeout` and the child is killed when it expires.
#[derive(Debug, Clone)]
pub struct GeminiRunner {
    pub model: String,
    pub prompt: String,
    pub input_char_limit: usize,
    pub telemetry_path: PathBuf,
    pub timeout: Duration,
    /// Extra environment for the child (e.g. `GEMINI_API_KEY`). Passed to
    /// the subprocess only, never set on the parent.
    pub env: Vec<(String, String)>,
    /// Explicit binary path; skips `GEMINI_BIN`/PATH resolution when set.
    pub binary: Option<PathBuf>,
    /// Fallback argv prefix; defaults to `npx -y @google/gemini-cli`.
    pub fallback: Vec<String>,
}

/// Internal outcome of a single invocation attempt.
enum InvokeFailure {
    /// Spawn error or non-zero exit, with a formatted diagnostic.
    Diag(String),
    Timeout,
}

impl GeminiRunner {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            input_char_limit: DEFAULT_INPUT_CHAR_LIMIT,
            telemetry_path: PathBuf::from("telemetry.log"),
            timeout: DEFAULT_TIMEOUT,
            env: Vec::new(),
            binary: None,
            fallback: FALLBACK_RUNNER.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Feed `input` to the Gemini CLI and return its sanitized output.
    pub async fn run(&self, input: &str) -> Result<String> {
        let input = truncate_chars(input, self.input_char_limit);

        let primary = match &self.binary {
            Some(bin) => Some(bin.clone()),
            None => resolve_gemini_binary(),
        };

        let combined = match primary {
            Some(bin) => {
                let mut argv = vec![bin.to_string_lossy().into_owned()];
                argv.extend(self.base_args());
                match self.invoke(&argv, input).await {
                    Ok(out) => out,
                    Err(InvokeFailure::Timeout) => {
                        return Err(GeminiAgentError::Timeout(self.timeout))
                    }
                    Err(InvokeFailure::Diag(primary_diag)) => {
                        tracing::warn!(
                            binary = %bin.display(),
                            "gemini binary failed, trying npx fallback"
                        );
                        match self.invoke(&self.fallback_argv(), input).await {
                            Ok(out) => out,
                            Err(InvokeFailure::Timeout) => {
                                return Err(GeminiAgentError::Timeout(self.timeout))
                            }
                            Err(InvokeFailure::Diag(fallback_diag)) => {
                                return Err(GeminiAgentError::BothFailed {
                                    primary: primary_diag,
                                    fallback: fallback_diag,
                                })
                            }
                        }
                    }
                }
            }
            None => match self.invoke(&self.fallback_argv(), input).await {
                Ok(out) => out,
                Err(InvokeFailure::Timeout) => {
                    return Err(GeminiAgentError::Timeout(self.timeout))
                }
                Err(InvokeFailure::Diag(diag)) => {
                    return Err(GeminiAgentError::FallbackFailed(diag))
                }
            },
        };

        let cleaned = sanitize_output(&combined);
        if cleaned.is_empty() {
            return Err(GeminiAgentError::EmptyOutput);
        }
        Ok(cleaned)
    }

    fn base_args(&self) -> Vec<String> {
        vec![
            "--telemetry-outfile".to_string(),
            self.telemetry_path.to_string_lossy().into_owned(),
            "--telemetry=false".to_string(),
            "-m".to_string(),
            self.model.clone(),
            "-p".to_string(),
            self.prompt.clone(),
        ]
    }

    fn fallback_argv(&self) -> Vec<String> {
        let mut argv = self.fallback.clone();
        argv.extend(self.base_args());
        argv
    }

    /// Spawn one invocation, feed stdin, and collect combined stdout+stderr.
    ///
    /// The stdin write runs concurrently with output collection so a child
    /// that interleaves reading and writing cannot deadlock the pipe.
    async fn invoke(
        &self,
        argv: &[String],
        input: &str,
    ) -> std::result::Result<String, InvokeFailure> {
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| InvokeFailure::Diag(format!("failed to spawn '{}': {e}", argv[0])))?;

        let stdin = child.stdin.take();
        let bytes = input.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                // A child that exits without draining stdin is not an error.
                let _ = stdin.write_all(&bytes).await;
                let _ = stdin.shutdown().await;
            }
        });

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                writer.abort();
                return Err(InvokeFailure::Diag(format!("error={e}")));
            }
            Err(_) => {
                // Dropping the wait future drops the child; kill_on_drop
                // terminates it.
                writer.abort();
                return Err(InvokeFailure::Timeout);
            }
        };
        let _ = writer.await;

        if output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(combined)
        } else {
            Err(InvokeFailure::Diag(explain(&output)))
        }
    }
}

/// Format a failed invocation for error aggregation: exit status plus
/// whatever the child said on stderr (or stdout).
fn explain(output: &std::process::Output) -> String {
    let mut parts = Vec::new();
    match output.status.code() {
        Some(code) => parts.push(format!("status={code}")),
        None => parts.push("terminated by signal".to_string()),
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let said = if stderr.trim().is_empty() {
        stdout
    } else {
        stderr
    };
    if !said.trim().is_empty() {
        parts.push(said.trim().to_string());
    }
    parts.join("\n")
}

static DISCLAIMER_RE: OnceLock<Regex> = OnceLock::new();

/// Drop the CLI's telemetry disclaimer lines and surrounding whitespace.
fn sanitize_output(raw: &str) -> String {
    let re = DISCLAIMER_RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*Data collection is disabled\.\s*$").expect("valid regex")
    });
    re.replace_all(raw, "").trim().to_string()
}

/// Truncate to at most `limit` characters on a char boundary.
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn runner_with_binary(bin: PathBuf) -> GeminiRunner {
        let mut runner = GeminiRunner::new("test-model", "test-prompt");
        runner.binary = Some(bin);
        runner
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("한국어텍스트", 3), "한국어");
    }

    #[test]
    fn sanitize_strips_disclaimer_lines() {
        let raw = "Data collection is disabled.\nActual output\n  data collection is disabled.  \n";
        assert_eq!(sanitize_output(raw), "Actual output");
    }

    #[test]
    fn sanitize_keeps_embedded_mentions() {
        let raw = "Note: Data collection is disabled. More text on same line";
        assert_eq!(sanitize_output(raw), raw);
    }

    #[test]
    fn base_args_carry_model_prompt_and_telemetry_flags() {
        let mut runner = GeminiRunner::new("m1", "p1");
        runner.telemetry_path = PathBuf::from("/tmp/t.log");
        let args = runner.base_args();
        assert_eq!(
            args,
            vec![
                "--telemetry-outfile",
                "/tmp/t.log",
                "--telemetry=false",
                "-m",
                "m1",
                "-p",
                "p1"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_pipes_stdin_through_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(dir.path(), "fake-gemini", "cat");
        let runner = runner_with_binary(bin);
        let out = runner.run("Reviewed. Looks fine.").await.unwrap();
        assert_eq!(out, "Reviewed. Looks fine.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_truncates_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(dir.path(), "fake-gemini", "cat");
        let mut runner = runner_with_binary(bin);
        runner.input_char_limit = 5;
        let out = runner.run("abcdefgh").await.unwrap();
        assert_eq!(out, "abcde");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_strips_disclaimer() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(
            dir.path(),
            "fake-gemini",
            "cat >/dev/null\necho 'Data collection is disabled.'\necho 'The review.'",
        );
        let runner = runner_with_binary(bin);
        let out = runner.run("input").await.unwrap();
        assert_eq!(out, "The review.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_output_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(dir.path(), "fake-gemini", "cat >/dev/null");
        let runner = runner_with_binary(bin);
        let err = runner.run("input").await.unwrap_err();
        assert!(matches!(err, GeminiAgentError::EmptyOutput));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fallback_runs_when_primary_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken = write_script(dir.path(), "broken", "echo 'boom' >&2\nexit 1");
        let good = write_script(dir.path(), "good", "cat >/dev/null\necho 'from fallback'");
        let mut runner = runner_with_binary(broken);
        runner.fallback = vec![good.to_string_lossy().into_owned()];
        let out = runner.run("input").await.unwrap();
        assert_eq!(out, "from fallback");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn both_failures_aggregate_diagnostics() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken = write_script(dir.path(), "broken", "echo 'primary boom' >&2\nexit 1");
        let also_broken = write_script(dir.path(), "also-broken", "echo 'fallback boom' >&2\nexit 2");
        let mut runner = runner_with_binary(broken);
        runner.fallback = vec![also_broken.to_string_lossy().into_owned()];
        let err = runner.run("input").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("primary boom"), "missing primary diag: {msg}");
        assert!(msg.contains("fallback boom"), "missing fallback diag: {msg}");
        assert!(msg.contains("status=1"));
        assert!(msg.contains("status=2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_invocation_times_out() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(dir.path(), "slow", "sleep 5");
        let mut runner = runner_with_binary(bin);
        runner.timeout = Duration::from_millis(100);
        let err = runner.run("input").await.unwrap_err();
        assert!(matches!(err, GeminiAgentError::Timeout(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn child_env_is_passed_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = write_script(dir.path(), "env-echo", "cat >/dev/null\necho \"$GEMINI_API_KEY\"");
        let mut runner = runner_with_binary(bin);
        runner.env = vec![("GEMINI_API_KEY".to_string(), "secret-123".to_string())];
        let out = runner.run("input").await.unwrap();
        assert_eq!(out, "secret-123");
    }
}
