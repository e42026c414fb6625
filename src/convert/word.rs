//! `pdf-to-word`: rebuild the text flow of every page as a `.docx`.
//!
//! Each source page becomes a run of paragraphs followed by a page break.
//! Headings are bold runs at their original size (in the manner of a
//! hand-formatted document, no style sheet); centred lines stay centred.
//! The first page's size becomes the document's page size.

use super::ConversionSummary;
use crate::error::WorkerError;
use crate::pipeline::layout::{self, BlockKind, PageText};
use crate::pipeline::text::extract_pages;
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};
use pdfium_render::prelude::PdfDocument;
use std::path::Path;
use tracing::{debug, warn};

const TOOL: &str = "pdf-to-word";

/// Points → twentieths of a point, the unit of `w:pgSz`.
fn twips(points: f32) -> u32 {
    (points.max(1.0) * 20.0).round() as u32
}

/// Points → half-points, the unit of `w:sz`.
fn half_points(points: f32) -> usize {
    (points * 2.0).round().clamp(2.0, 3276.0) as usize
}

pub fn convert(
    document: &PdfDocument<'_>,
    source: &Path,
    output: &Path,
) -> Result<ConversionSummary, WorkerError> {
    let pages = extract_pages(document, source)?;
    write_docx(&pages, output)
}

/// Lay out `pages` and write them to `output` as a Word document.
pub fn write_docx(pages: &[PageText], output: &Path) -> Result<ConversionSummary, WorkerError> {
    let body_size = layout::body_font_size(pages);
    let mut doc = Docx::new();
    if let Some(first) = pages.first() {
        doc = doc.page_size(twips(first.width), twips(first.height));
    }

    let mut blocks = 0;
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            doc = doc.add_paragraph(
                Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
            );
        }

        let lines = layout::build_lines(&page.glyphs);
        let paragraphs = layout::build_paragraphs(&lines, page.width, body_size);
        if paragraphs.is_empty() {
            warn!("Page {} has no extractable text", page.number);
        }
        debug!("Page {}: {} paragraphs", page.number, paragraphs.len());

        for para in paragraphs {
            let mut run = Run::new()
                .add_text(para.text.as_str())
                .size(half_points(para.font_size));
            if para.bold || matches!(para.kind, BlockKind::Heading(_)) {
                run = run.bold();
            }
            let mut paragraph = Paragraph::new().add_run(run);
            if para.centered {
                paragraph = paragraph.align(AlignmentType::Center);
            }
            doc = doc.add_paragraph(paragraph);
            blocks += 1;
        }
    }

    let file = std::fs::File::create(output).map_err(WorkerError::Staging)?;
    doc.build()
        .pack(file)
        .map_err(|e| WorkerError::conversion(TOOL, format!("failed to write DOCX: {}", e)))?;

    Ok(ConversionSummary {
        pages: pages.len(),
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::layout::tests::glyphs_for;
    use std::io::Read;
    use tempfile::TempDir;

    fn document_xml(path: &Path) -> String {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    fn page(number: usize, glyphs: Vec<layout::Glyph>) -> PageText {
        PageText {
            number,
            width: 612.0,
            height: 792.0,
            glyphs,
        }
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(twips(612.0), 12240);
        assert_eq!(half_points(12.0), 24);
        assert_eq!(half_points(0.0), 2);
    }

    #[test]
    fn writes_paragraphs_and_page_breaks() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.docx");

        let mut first = glyphs_for("Annual Report", 72.0, 740.0, 24.0);
        first.extend(glyphs_for("Revenue grew this year.", 72.0, 700.0, 12.0));
        let second = glyphs_for("Appendix text.", 72.0, 700.0, 12.0);

        let summary = write_docx(&[page(1, first), page(2, second)], &out).unwrap();
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.blocks, 3);

        let xml = document_xml(&out);
        assert!(xml.contains("Annual Report"));
        assert!(xml.contains("Revenue grew this year."));
        assert!(xml.contains("Appendix text."));
        assert!(xml.contains(r#"w:type="page""#));
    }

    #[test]
    fn empty_document_still_produces_a_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("empty.docx");
        let summary = write_docx(&[page(1, Vec::new())], &out).unwrap();
        assert_eq!(summary.blocks, 0);
        assert!(out.exists());
    }
}
