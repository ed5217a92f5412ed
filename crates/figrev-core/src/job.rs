use crate::error::Result;
use crate::io::ensure_dir;
use chrono::{SecondsFormat, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Per-request job directories
// ---------------------------------------------------------------------------

/// Job directories kept per user before the oldest are evicted.
pub const DEFAULT_JOB_RETENTION: usize = 20;

/// Filesystem layout for one review job: a per-credential user directory
/// holding per-job directories with the extracted markdown, the generated
/// review, and the tool's telemetry log.
#[derive(Debug, Clone)]
pub struct JobPaths {
    pub uid: String,
    pub job_id: String,
    pub user_dir: PathBuf,
    pub job_dir: PathBuf,
    pub md_path: PathBuf,
    pub review_path: PathBuf,
    pub telemetry_path: PathBuf,
}

/// Directory key for a credential: first 12 hex chars of its SHA-256, so
/// the token itself never lands on disk.
pub fn user_hash(figma_pat: &str) -> String {
    use std::fmt::Write;
    let digest = Sha256::digest(figma_pat.as_bytes());
    let mut hex = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

impl JobPaths {
    /// Create the directory tree for a new job and evict the oldest jobs
    /// beyond `retention` for this user.
    ///
    /// Job ids are an ISO-8601 UTC timestamp (with `:` and `.` replaced by
    /// `-`, so they sort chronologically as plain strings) plus a random
    /// 6-char suffix.
    pub fn create(data_dir: &Path, figma_pat: &str, retention: usize) -> Result<Self> {
        let uid = user_hash(figma_pat);
        let user_dir = data_dir.join(&uid);

        let ts = Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let rand_suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        let job_id = format!("{ts}-{rand_suffix}");
        let job_dir = user_dir.join(&job_id);

        ensure_dir(&job_dir)?;
        evict_old_jobs(&user_dir, retention)?;

        Ok(Self {
            uid,
            job_id,
            md_path: job_dir.join("figma.md"),
            review_path: job_dir.join("review.md"),
            telemetry_path: job_dir.join("telemetry.log"),
            user_dir,
            job_dir,
        })
    }
}

/// Remove the oldest job directories beyond `retention`. Job ids sort
/// chronologically, so lexicographic order is creation order.
fn evict_old_jobs(user_dir: &Path, retention: usize) -> Result<()> {
    let mut jobs: Vec<PathBuf> = std::fs::read_dir(user_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    if jobs.len() <= retention {
        return Ok(());
    }
    jobs.sort();
    let excess = jobs.len() - retention;
    for old in &jobs[..excess] {
        tracing::debug!(job_dir = %old.display(), "evicting old job directory");
        std::fs::remove_dir_all(old)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_short() {
        let a = user_hash("my-token");
        let b = user_hash("my-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_tokens_hash_differently() {
        assert_ne!(user_hash("token-a"), user_hash("token-b"));
    }

    #[test]
    fn create_builds_directory_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let job = JobPaths::create(dir.path(), "pat", DEFAULT_JOB_RETENTION).unwrap();
        assert!(job.job_dir.is_dir());
        assert!(job.job_dir.starts_with(&job.user_dir));
        assert_eq!(job.md_path.file_name().unwrap(), "figma.md");
        assert_eq!(job.review_path.file_name().unwrap(), "review.md");
        assert_eq!(job.telemetry_path.file_name().unwrap(), "telemetry.log");
    }

    #[test]
    fn job_ids_are_unique() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = JobPaths::create(dir.path(), "pat", DEFAULT_JOB_RETENTION).unwrap();
        let b = JobPaths::create(dir.path(), "pat", DEFAULT_JOB_RETENTION).unwrap();
        assert_ne!(a.job_id, b.job_id);
        assert_eq!(a.user_dir, b.user_dir);
    }

    #[test]
    fn old_jobs_are_evicted_beyond_retention() {
        let dir = tempfile::TempDir::new().unwrap();
        for _ in 0..5 {
            JobPaths::create(dir.path(), "pat", 3).unwrap();
            // distinct millisecond timestamps so job ids sort by creation
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        let user_dir = dir.path().join(user_hash("pat"));
        let count = std::fs::read_dir(&user_dir).unwrap().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn newest_job_survives_eviction() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut last = None;
        for _ in 0..4 {
            last = Some(JobPaths::create(dir.path(), "pat", 2).unwrap());
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(last.unwrap().job_dir.is_dir());
    }
}
