//! Error types for the pdf-office-worker library.
//!
//! Every failure in the job lifecycle — a malformed descriptor, an unknown
//! tool, a storage transfer, a converter — is a [`WorkerError`]. The worker
//! never branches on the variant once the pipeline has failed: the error is
//! rendered with `Display` into the `error` field of the result envelope
//! (see [`crate::envelope::ResultEnvelope`]). The variants exist so library
//! callers and tests can match on the cause without parsing strings.
//!
//! Storage errors carry the transport message verbatim in their `Display`
//! output; callers of the worker rely on seeing the storage provider's own
//! wording.

use crate::storage::UrlError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-office-worker library.
#[derive(Debug, Error)]
pub enum WorkerError {
    // ── Job errors ────────────────────────────────────────────────────────
    /// The job descriptor is not valid JSON or lacks a required field.
    #[error("malformed job: {0}")]
    MalformedJob(String),

    /// The `tool` field names a conversion this worker does not implement.
    #[error("unsupported tool '{tool}': expected one of pdf-to-word, pdf-to-excel, pdf-to-ppt")]
    UnsupportedTool { tool: String },

    // ── Storage errors ────────────────────────────────────────────────────
    /// The source URL does not address an object in the configured bucket.
    #[error("invalid source URL '{url}': {source}")]
    InvalidSourceUrl {
        url: String,
        #[source]
        source: UrlError,
    },

    /// Downloading the source object failed.
    #[error("{reason}")]
    FetchFailed { key: String, reason: String },

    /// Uploading the converted document failed.
    #[error("{reason}")]
    PublishFailed { key: String, reason: String },

    /// The staging directory could not be created or written.
    #[error("staging error: {0}")]
    Staging(#[source] std::io::Error),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The downloaded object is not a PDF.
    #[error("file is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but the job did not provide one.
    #[error("PDF '{path}' is encrypted and requires a password (set options.password on the job)")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH (or --pdfium-lib) to a libpdfium file or the directory containing it."
    )]
    PdfiumBindingFailed(String),

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A converter back-end failed while producing its output.
    #[error("{tool} conversion failed: {detail}")]
    ConversionFailed { tool: String, detail: String },

    /// The table extractor found nothing to put in a workbook.
    #[error("no tables detected in {pages} page(s); nothing to export to a workbook")]
    NoTablesFound { pages: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkerError {
    /// Shorthand for a [`WorkerError::ConversionFailed`] from any displayable cause.
    pub fn conversion(tool: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        WorkerError::ConversionFailed {
            tool: tool.into(),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display_is_verbatim() {
        let e = WorkerError::FetchFailed {
            key: "in1.pdf".into(),
            reason: "NoSuchKey: The specified key does not exist.".into(),
        };
        assert_eq!(e.to_string(), "NoSuchKey: The specified key does not exist.");
    }

    #[test]
    fn unsupported_tool_display_names_tool() {
        let e = WorkerError::UnsupportedTool {
            tool: "pdf-to-csv".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("pdf-to-csv"), "got: {msg}");
        assert!(msg.contains("pdf-to-word"), "got: {msg}");
    }

    #[test]
    fn no_tables_display() {
        let e = WorkerError::NoTablesFound { pages: 3 };
        assert!(e.to_string().contains("3 page(s)"));
    }

    #[test]
    fn conversion_helper_formats_detail() {
        let e = WorkerError::conversion("pdf-to-word", "disk full");
        assert_eq!(e.to_string(), "pdf-to-word conversion failed: disk full");
    }
}
