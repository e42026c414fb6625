//! Conversion dispatch: route a staged PDF to the converter for its tool.
//!
//! ## Why spawn_blocking?
//!
//! All three converters drive pdfium, which wraps a C++ library with
//! thread-local state that is not safe to call from async contexts. The
//! whole conversion (bind, open, extract or render, write) runs on one
//! blocking-pool thread, and the `PdfDocument` is dropped on that thread
//! whether the converter succeeds or fails.
//!
//! ## Converters
//!
//! | tool           | module    | output                                   |
//! |----------------|-----------|------------------------------------------|
//! | `pdf-to-word`  | [`word`]  | paragraphs rebuilt from the text layer   |
//! | `pdf-to-excel` | [`excel`] | one worksheet per detected table         |
//! | `pdf-to-ppt`   | [`ppt`]   | one full-bleed page image per slide      |

pub mod excel;
pub mod ppt;
pub mod pptx;
pub mod word;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::job::Tool;
use crate::pipeline::document::{bind_pdfium, open_document};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// What a converter produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Pages read from the source PDF.
    pub pages: usize,
    /// Paragraphs, worksheets or slides written, depending on the tool.
    pub blocks: usize,
}

/// Convert the PDF at `input` into `output` with the converter for `tool`.
pub async fn convert(
    tool: Tool,
    input: &Path,
    output: &Path,
    password: Option<String>,
    config: &WorkerConfig,
) -> Result<ConversionSummary, WorkerError> {
    let input = input.to_path_buf();
    let output = output.to_path_buf();
    let config = config.clone();
    let start = Instant::now();

    let summary = tokio::task::spawn_blocking(move || {
        convert_blocking(tool, &input, &output, password.as_deref(), &config)
    })
    .await
    .map_err(|e| WorkerError::Internal(format!("Conversion task panicked: {}", e)))??;

    info!(
        "{} done: {} pages → {} blocks in {}ms",
        tool,
        summary.pages,
        summary.blocks,
        start.elapsed().as_millis()
    );
    Ok(summary)
}

/// Blocking implementation of [`convert`].
pub fn convert_blocking(
    tool: Tool,
    input: &Path,
    output: &Path,
    password: Option<&str>,
    config: &WorkerConfig,
) -> Result<ConversionSummary, WorkerError> {
    let engine = bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let document = open_document(&engine, input, password)?;

    match tool {
        Tool::PdfToWord => word::convert(&document, input, output),
        Tool::PdfToExcel => excel::convert(
            &document,
            input,
            output,
            config.min_table_rows,
            config.column_gap_em,
        ),
        Tool::PdfToPpt => ppt::convert(&document, output, config),
    }
}
