//! S3-backed [`ObjectStore`].
//!
//! Credentials come from the AWS default provider chain (environment,
//! profile, instance metadata). Errors are rendered with
//! [`DisplayErrorContext`] so the envelope carries the service's own error
//! code and message rather than the SDK's terse "service error".

use super::{ObjectStore, StorageError};
use crate::config::WorkerConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// An S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Wrap a pre-built client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the environment and the worker configuration.
    pub async fn from_config(config: &WorkerConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        info!(
            "S3 store ready: bucket={} region={}",
            config.bucket, config.region
        );
        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn download(&self, key: &str, dest: &Path) -> Result<(), StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError(DisplayErrorContext(&e).to_string()))?;

        let write_err = |e: std::io::Error| {
            StorageError(format!("failed to write {}: {}", dest.display(), e))
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;
        let body = output.body.into_async_read();
        tokio::pin!(body);
        let written = tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| StorageError(format!("failed to read object body: {}", e)))?;
        file.flush().await.map_err(write_err)?;

        debug!("GET s3://{}/{} → {} bytes", self.bucket, key, written);
        Ok(())
    }

    async fn upload(&self, src: &Path, key: &str, content_type: &str) -> Result<(), StorageError> {
        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| StorageError(format!("failed to open {}: {}", src.display(), e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError(DisplayErrorContext(&e).to_string()))?;

        debug!("PUT s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Credentials;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Answer one request on a local port with `status` and `body`;
    /// returns the endpoint URL.
    async fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn store(endpoint: &str) -> S3Store {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .force_path_style(true)
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .build();
        S3Store::new(Client::from_conf(conf), "pdf-master-storage")
    }

    #[tokio::test]
    async fn download_streams_body_to_file() {
        let body: Vec<u8> = b"%PDF-1.7\n"
            .iter()
            .copied()
            .chain((0..300_000u32).map(|i| (i % 251) as u8))
            .collect();
        let endpoint = serve_once("200 OK", "application/pdf", body.clone()).await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("input.pdf");
        store(&endpoint).download("in1.pdf", &dest).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn missing_object_carries_service_code() {
        let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><Key>in1.pdf</Key></Error>".to_vec();
        let endpoint = serve_once("404 Not Found", "application/xml", xml).await;

        let dir = TempDir::new().unwrap();
        let err = store(&endpoint)
            .download("in1.pdf", &dir.path().join("input.pdf"))
            .await
            .unwrap_err();
        assert!(err.0.contains("NoSuchKey"), "got: {err}");
    }
}
