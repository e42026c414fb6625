//! Publication: upload a converted document under its job-scoped key.

use crate::error::WorkerError;
use crate::job::Tool;
use crate::storage::{BucketUrls, ObjectStore};
use std::path::Path;
use tracing::info;

/// Destination key for a job's output: `{prefix}{job_id}{extension}`.
pub fn output_key(prefix: &str, job_id: &str, tool: Tool) -> String {
    format!("{}{}{}", prefix, job_id, tool.extension())
}

/// Upload `local` and return the public URL of the stored object.
///
/// An existing object under the same key is replaced, so re-running a job
/// yields the same URL.
pub async fn publish(
    store: &dyn ObjectStore,
    urls: &BucketUrls,
    local: &Path,
    prefix: &str,
    job_id: &str,
    tool: Tool,
) -> Result<String, WorkerError> {
    let key = output_key(prefix, job_id, tool);
    store
        .upload(local, &key, tool.content_type())
        .await
        .map_err(|e| WorkerError::PublishFailed {
            key: key.clone(),
            reason: e.to_string(),
        })?;

    let url = urls.object_url(&key);
    info!("Published {}", url);
    Ok(url)
}
