//! Input staging: fetch the job's source object into a per-job scratch area.
//!
//! ## Why a staging directory?
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer
//! held by the storage client. Every job gets its own `TempDir` holding the
//! downloaded source and the converted output; both disappear when
//! [`Staging`] is dropped, including on early returns and panics, so a
//! worker host never accumulates job files. We validate the PDF magic bytes
//! (`%PDF`) right after the download so callers get a meaningful error
//! rather than a pdfium crash.

use crate::error::WorkerError;
use crate::job::Tool;
use crate::storage::{BucketUrls, ObjectStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

const INPUT_FILE_NAME: &str = "input.pdf";

/// Scratch directory scoped to one job.
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    /// Create a fresh, empty staging directory under the system temp dir.
    pub fn new() -> Result<Self, WorkerError> {
        let dir = tempfile::Builder::new()
            .prefix("office-worker-")
            .tempdir()
            .map_err(WorkerError::Staging)?;
        debug!("Staging directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the downloaded source PDF lives.
    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(INPUT_FILE_NAME)
    }

    /// Where the converter writes its output for `tool`.
    pub fn output_path(&self, tool: Tool) -> PathBuf {
        self.dir.path().join(format!("output{}", tool.extension()))
    }
}

/// Download the object addressed by `source_url` into the staging area and
/// check that it is a PDF.
///
/// Returns the local path of the staged file.
pub async fn fetch_source(
    store: &dyn ObjectStore,
    urls: &BucketUrls,
    source_url: &str,
    staging: &Staging,
) -> Result<PathBuf, WorkerError> {
    let key = urls
        .key_from_url(source_url)
        .map_err(|source| WorkerError::InvalidSourceUrl {
            url: source_url.to_string(),
            source,
        })?;

    info!("Fetching s3://{}/{}", urls.bucket(), key);
    let dest = staging.input_path();
    store
        .download(&key, &dest)
        .await
        .map_err(|e| WorkerError::FetchFailed {
            key: key.clone(),
            reason: e.to_string(),
        })?;

    check_pdf_magic(&dest).await?;
    Ok(dest)
}

/// Verify the first bytes of `path` are `%PDF`.
pub async fn check_pdf_magic(path: &Path) -> Result<(), WorkerError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(WorkerError::Staging)?;

    let mut magic = Vec::with_capacity(4);
    (&mut file)
        .take(4)
        .read_to_end(&mut magic)
        .await
        .map_err(WorkerError::Staging)?;

    if magic != b"%PDF" {
        return Err(WorkerError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
