//! `pdf-to-ppt`: one full-bleed picture slide per page.

use super::pptx::PresentationWriter;
use super::ConversionSummary;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::pipeline::encode::encode_png;
use crate::pipeline::render::render_each_page;
use pdfium_render::prelude::PdfDocument;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

const TOOL: &str = "pdf-to-ppt";

pub fn convert(
    document: &PdfDocument<'_>,
    output: &Path,
    config: &WorkerConfig,
) -> Result<ConversionSummary, WorkerError> {
    let file = std::fs::File::create(output).map_err(WorkerError::Staging)?;
    let mut writer = PresentationWriter::new(BufWriter::new(file), config.slide_size);

    let pages = render_each_page(document, config.dpi, config.max_rendered_pixels, |_, image| {
        let png = encode_png(&image).map_err(|e| WorkerError::conversion(TOOL, e))?;
        writer
            .add_picture_slide(&png)
            .map_err(|e| WorkerError::conversion(TOOL, e))
    })?;
    if pages == 0 {
        warn!("Document has no pages; writing an empty presentation");
    }

    let slides = writer.slide_count();
    let mut inner = writer
        .finish()
        .map_err(|e| WorkerError::conversion(TOOL, e))?;
    inner.flush().map_err(WorkerError::Staging)?;

    Ok(ConversionSummary {
        pages,
        blocks: slides,
    })
}
