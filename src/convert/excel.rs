//! `pdf-to-excel`: export every detected table as its own worksheet.

use super::ConversionSummary;
use crate::error::WorkerError;
use crate::pipeline::layout::{self, PageText, Table};
use crate::pipeline::postprocess::parse_number;
use crate::pipeline::text::extract_pages;
use pdfium_render::prelude::PdfDocument;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

const TOOL: &str = "pdf-to-excel";

pub fn convert(
    document: &PdfDocument<'_>,
    source: &Path,
    output: &Path,
    min_rows: usize,
    column_gap_em: f32,
) -> Result<ConversionSummary, WorkerError> {
    let pages = extract_pages(document, source)?;
    let tables = find_tables(&pages, min_rows, column_gap_em);
    if tables.is_empty() {
        return Err(WorkerError::NoTablesFound { pages: pages.len() });
    }
    write_workbook(&tables, output)?;
    Ok(ConversionSummary {
        pages: pages.len(),
        blocks: tables.len(),
    })
}

/// All tables of all pages, in reading order.
pub fn find_tables(pages: &[PageText], min_rows: usize, column_gap_em: f32) -> Vec<Table> {
    pages
        .iter()
        .flat_map(|page| {
            let lines = layout::build_lines(&page.glyphs);
            let tables = layout::detect_tables(page, &lines, min_rows, column_gap_em);
            debug!("Page {}: {} tables", page.number, tables.len());
            tables
        })
        .collect()
}

/// Worksheet names: `page-{page}-table-{n}`, `n` counting from 1 per page.
pub fn sheet_names(tables: &[Table]) -> Vec<String> {
    let mut names = Vec::with_capacity(tables.len());
    let mut last_page = 0;
    let mut n = 0;
    for table in tables {
        if table.page != last_page {
            last_page = table.page;
            n = 0;
        }
        n += 1;
        names.push(format!("page-{}-table-{}", table.page, n));
    }
    names
}

/// Write `tables` to a workbook at `output`, one worksheet each.
pub fn write_workbook(tables: &[Table], output: &Path) -> Result<(), WorkerError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (table, name) in tables.iter().zip(sheet_names(tables)) {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&name)
            .map_err(|e| WorkerError::conversion(TOOL, e))?;
        write_table(worksheet, table, &header_format).map_err(|e| WorkerError::conversion(TOOL, e))?;
        worksheet.autofit();
    }

    workbook
        .save(output)
        .map_err(|e| WorkerError::conversion(TOOL, format!("failed to save XLSX: {}", e)))
}

fn write_table(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<(), XlsxError> {
    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let c = col_idx as u16;
            match (row_idx == 0, parse_number(cell)) {
                (true, Some(num)) => worksheet.write_number_with_format(r, c, num, header_format)?,
                (true, None) => worksheet.write_string_with_format(r, c, cell, header_format)?,
                (false, Some(num)) => worksheet.write_number(r, c, num)?,
                (false, None) => worksheet.write_string(r, c, cell)?,
            };
        }
    }
    Ok(())
}
