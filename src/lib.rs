//! # pdf-office-worker
//!
//! A one-shot job worker that converts PDF documents held in object storage
//! into Word (`.docx`), Excel (`.xlsx`) or PowerPoint (`.pptx`) files.
//!
//! ## Why a one-shot worker?
//!
//! The worker is spawned by a dispatcher once per job. It reads a single job
//! descriptor from stdin and writes a single JSON envelope to stdout, so the
//! dispatcher never has to parse logs and a crashed conversion cannot leak
//! state into the next one.
//!
//! ## Pipeline Overview
//!
//! ```text
//! stdin job
//!  │
//!  ├─ 1. Read     parse + validate the job (tool, job_id, files[0])
//!  ├─ 2. Fetch    download files[0] into a per-job staging directory
//!  ├─ 3. Convert  pdfium text/raster → docx-rs | rust_xlsxwriter | pptx (spawn_blocking)
//!  ├─ 4. Publish  upload to {prefix}{job_id}{ext}
//!  └─ 5. Report   {"status":"completed","url":…} or {"status":"error","error":…}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_office_worker::{LocalStore, Worker, WorkerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorkerConfig::builder().bucket("pdf-master-storage").build()?;
//!     let worker = Worker::new(config, Arc::new(LocalStore::new("./bucket")));
//!     let envelope = worker
//!         .run(r#"{"tool":"pdf-to-word","job_id":"job1","files":["s3://pdf-master-storage/in1.pdf"]}"#)
//!         .await;
//!     println!("{}", envelope.to_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `office-worker` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding the worker in another service:
//! ```toml
//! pdf-office-worker = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod envelope;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod storage;
pub mod worker;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SlideSize, WorkerConfig, WorkerConfigBuilder};
pub use convert::{convert, ConversionSummary};
pub use envelope::ResultEnvelope;
pub use error::WorkerError;
pub use job::{Job, JobDescriptor, Tool};
pub use storage::{BucketUrls, LocalStore, ObjectStore, S3Store, StorageError, UrlError};
pub use worker::Worker;
