//! The job lifecycle: read → fetch → convert → publish → report.
//!
//! ## Why one `Result` around the whole pipeline?
//!
//! The worker's only externally observable output is the result envelope.
//! Every stage returns `Result<_, WorkerError>` and [`Worker::run`] turns
//! the final `Result<String, WorkerError>` into exactly one
//! [`ResultEnvelope`], so no failure path can skip reporting.
//!
//! Stages run strictly in sequence; nothing is retried. The per-job
//! [`Staging`] directory lives for the duration of [`Worker::process`] and
//! is removed when it returns, on success and on every error path.

use crate::config::WorkerConfig;
use crate::convert::convert;
use crate::envelope::ResultEnvelope;
use crate::error::WorkerError;
use crate::job::Job;
use crate::pipeline::input::{fetch_source, Staging};
use crate::pipeline::publish::publish;
use crate::storage::{BucketUrls, ObjectStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Runs conversion jobs against one bucket.
pub struct Worker {
    config: WorkerConfig,
    store: Arc<dyn ObjectStore>,
    urls: BucketUrls,
}

impl Worker {
    pub fn new(config: WorkerConfig, store: Arc<dyn ObjectStore>) -> Self {
        let urls = BucketUrls::new(config.bucket.clone());
        Self { config, store, urls }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the job described by the JSON text `input` and report its outcome.
    pub async fn run(&self, input: &str) -> ResultEnvelope {
        let result = self.process_json(input).await;
        if let Err(ref e) = result {
            error!("Job failed: {}", e);
        }
        ResultEnvelope::from(result)
    }

    /// Parse `input` as a job and process it.
    pub async fn process_json(&self, input: &str) -> Result<String, WorkerError> {
        let job = Job::from_json(input)?;
        self.process(&job).await
    }

    /// Process a validated job; returns the URL of the published output.
    pub async fn process(&self, job: &Job) -> Result<String, WorkerError> {
        let start = Instant::now();
        info!("Job {}: {} ← {}", job.job_id, job.tool, job.source_url);

        // ── Step 1: Fetch ────────────────────────────────────────────────
        let staging = Staging::new()?;
        let input = fetch_source(self.store.as_ref(), &self.urls, &job.source_url, &staging).await?;

        // ── Step 2: Convert ──────────────────────────────────────────────
        let output = staging.output_path(job.tool);
        convert(job.tool, &input, &output, job.password.clone(), &self.config).await?;

        // ── Step 3: Publish ──────────────────────────────────────────────
        let url = publish(
            self.store.as_ref(),
            &self.urls,
            &output,
            &self.config.output_prefix,
            &job.job_id,
            job.tool,
        )
        .await?;

        info!(
            "Job {} completed in {}ms",
            job.job_id,
            start.elapsed().as_millis()
        );
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use tempfile::TempDir;

    fn worker(root: &std::path::Path) -> Worker {
        Worker::new(WorkerConfig::default(), Arc::new(LocalStore::new(root)))
    }

    #[tokio::test]
    async fn malformed_input_reports_error() {
        let bucket = TempDir::new().unwrap();
        let env = worker(bucket.path()).run("not json").await;
        assert!(!env.is_success());
        assert_eq!(env.exit_status(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_fails_before_fetch() {
        let bucket = TempDir::new().unwrap();
        let err = worker(bucket.path())
            .process_json(r#"{"tool":"pdf-to-csv","job_id":"j","files":["s3://pdf-master-storage/missing.pdf"]}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::UnsupportedTool { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn missing_source_reports_store_message() {
        let bucket = TempDir::new().unwrap();
        let env = worker(bucket.path())
            .run(r#"{"tool":"pdf-to-word","job_id":"job1","files":["https://pdf-master-storage.s3.amazonaws.com/in1.pdf"]}"#)
            .await;
        assert_eq!(
            env,
            ResultEnvelope::Error {
                error: "NoSuchKey: The specified key does not exist.".into()
            }
        );
    }
}
