//! Text-layer extraction: every page's characters with their positions.
//!
//! This is the only place the document converters touch pdfium's text API;
//! the output is plain [`PageText`] values that [`super::layout`] works on.
//! Scanned pages without a text layer come back with no glyphs.

use super::layout::{Glyph, PageText};
use crate::error::WorkerError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Extract the positioned characters of every page, in page order.
///
/// `source` is only used to label errors.
pub fn extract_pages(document: &PdfDocument<'_>, source: &Path) -> Result<Vec<PageText>, WorkerError> {
    let mut pages = Vec::new();

    for (index, page) in document.pages().iter().enumerate() {
        let number = index + 1;
        let text = page.text().map_err(|e| WorkerError::CorruptPdf {
            path: source.to_path_buf(),
            detail: format!("text layer of page {} unreadable: {}", number, e),
        })?;

        let mut glyphs = Vec::new();
        for ch in text.chars().iter() {
            let Some(c) = ch.unicode_char() else {
                continue;
            };
            let Ok(bounds) = ch.loose_bounds() else {
                continue;
            };

            // Some producers bake the size into the text matrix and leave a
            // nominal 1pt font size; fall back to the glyph box height.
            let size = ch.scaled_font_size().value;
            let font_size = if size > 1.0 {
                size
            } else {
                bounds.height().value
            };

            glyphs.push(
                Glyph::new(
                    c,
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.right().value,
                    bounds.top().value,
                    font_size,
                )
                .with_bold(is_bold_font(&ch.font_name())),
            );
        }

        debug!("Page {}: {} glyphs", number, glyphs.len());
        pages.push(PageText {
            number,
            width: page.width().value,
            height: page.height().value,
            glyphs,
        });
    }

    Ok(pages)
}

/// Whether a PostScript font name denotes a bold face.
fn is_bold_font(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|w| lower.contains(w))
}
