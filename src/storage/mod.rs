//! Object storage: the key-addressed blob store jobs read from and write to.
//!
//! ## Data Flow
//!
//! ```text
//! files[0] URL ──▶ BucketUrls::key_from_url ──▶ ObjectStore::download ──▶ staging/input.pdf
//! staging/out  ──▶ ObjectStore::upload ──▶ BucketUrls::object_url ──▶ envelope url
//! ```
//!
//! The store is injected into the worker as an `Arc<dyn ObjectStore>`;
//! [`S3Store`] talks to S3 (or an S3-compatible endpoint), [`LocalStore`]
//! treats a directory as the bucket.

pub mod local;
pub mod s3;

pub use local::LocalStore;
pub use s3::S3Store;

use std::path::Path;
use thiserror::Error;

/// A transfer failure, carrying the store's own message.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Why a URL does not address an object of the worker's bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("expected a URL under {expected}")]
    ForeignHost { expected: String },

    #[error("object is in bucket '{found}', worker serves '{expected}'")]
    OtherBucket { found: String, expected: String },

    #[error("URL has no object key")]
    MissingKey,
}

/// A key-addressed blob store bound to one bucket.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the object at `key` into the local file `dest`.
    async fn download(&self, key: &str, dest: &Path) -> Result<(), StorageError>;

    /// Upload the local file `src` to `key`, replacing any existing object.
    async fn upload(&self, src: &Path, key: &str, content_type: &str) -> Result<(), StorageError>;
}

/// Builds and parses the public URLs of one bucket.
///
/// Two shapes are understood:
///
/// * `https://{bucket}.s3.amazonaws.com/{key}` — produced by
///   [`object_url`](Self::object_url) and accepted by
///   [`key_from_url`](Self::key_from_url);
/// * `s3://{bucket}/{key}` — accepted only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketUrls {
    bucket: String,
}

impl BucketUrls {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn https_prefix(&self) -> String {
        format!("https://{}.s3.amazonaws.com/", self.bucket)
    }

    /// Fully qualified URL of `key`.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.https_prefix(), key)
    }

    /// Recover the storage key addressed by `url`.
    ///
    /// Fails when the URL belongs to another host or bucket, or addresses
    /// the bucket root.
    pub fn key_from_url(&self, url: &str) -> Result<String, UrlError> {
        let url = url.trim();
        let key = if let Some(rest) = url.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket != self.bucket {
                return Err(UrlError::OtherBucket {
                    found: bucket.to_string(),
                    expected: self.bucket.clone(),
                });
            }
            key
        } else if let Some(key) = url.strip_prefix(&self.https_prefix()) {
            key
        } else {
            return Err(UrlError::ForeignHost {
                expected: self.https_prefix(),
            });
        };

        if key.is_empty() {
            return Err(UrlError::MissingKey);
        }
        Ok(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> BucketUrls {
        BucketUrls::new("pdf-master-storage")
    }

    #[test]
    fn https_url_round_trip() {
        let u = urls();
        let url = u.object_url("processed/job1.docx");
        assert_eq!(
            url,
            "https://pdf-master-storage.s3.amazonaws.com/processed/job1.docx"
        );
        assert_eq!(u.key_from_url(&url).unwrap(), "processed/job1.docx");
    }

    #[test]
    fn s3_scheme_is_accepted() {
        assert_eq!(
            urls()
                .key_from_url("s3://pdf-master-storage/uploads/a b.pdf")
                .unwrap(),
            "uploads/a b.pdf"
        );
    }

    #[test]
    fn other_bucket_is_rejected() {
        assert!(matches!(
            urls().key_from_url("https://other.s3.amazonaws.com/in1.pdf"),
            Err(UrlError::ForeignHost { .. })
        ));
        assert_eq!(
            urls().key_from_url("s3://other/in1.pdf"),
            Err(UrlError::OtherBucket {
                found: "other".into(),
                expected: "pdf-master-storage".into(),
            })
        );
    }

    #[test]
    fn foreign_host_is_rejected() {
        let err = urls()
            .key_from_url("https://example.com/in1.pdf")
            .unwrap_err();
        assert!(
            err.to_string().contains("pdf-master-storage.s3.amazonaws.com"),
            "got: {err}"
        );
    }

    #[test]
    fn bucket_root_is_rejected() {
        assert_eq!(
            urls().key_from_url("https://pdf-master-storage.s3.amazonaws.com/"),
            Err(UrlError::MissingKey)
        );
        assert_eq!(
            urls().key_from_url("s3://pdf-master-storage"),
            Err(UrlError::MissingKey)
        );
    }
}
