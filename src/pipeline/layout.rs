//! Layout reconstruction: positioned glyphs → lines → paragraphs / tables.
//!
//! Everything here is pure geometry over [`PageText`]; PDFium is only
//! involved in producing the glyphs (see [`super::text`]). Coordinates are
//! PDF points with the origin at the bottom-left of the page, so "further
//! down the page" means a *smaller* `y`.
//!
//! ```text
//! glyphs ──▶ bands (same baseline) ──▶ words (gap > WORD_GAP_EM)
//!                                      │
//!                  ┌───────────────────┴───────────────────┐
//!                  ▼                                       ▼
//!     paragraphs (vertical gap, size, indent)   cells (gap > column_gap_em)
//!                                                          ▼
//!                                     tables (runs of ≥ min_rows multi-cell lines)
//! ```

use super::postprocess::{clean_text, join_line};

/// Horizontal gap, in ems, that separates two words.
const WORD_GAP_EM: f32 = 0.12;

/// Vertical gap, in ems, above which consecutive lines start a new paragraph.
const PARAGRAPH_GAP_EM: f32 = 0.7;

/// Vertical gap, in ems, above which two table rows belong to different tables.
const ROW_GAP_EM: f32 = 2.0;

/// Relative font-size difference that separates two paragraphs.
const SIZE_TOLERANCE: f32 = 0.15;

/// One positioned character.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
    pub font_size: f32,
    pub bold: bool,
}

impl Glyph {
    pub fn new(ch: char, left: f32, bottom: f32, right: f32, top: f32, font_size: f32) -> Self {
        Self {
            ch,
            left,
            bottom,
            right,
            top,
            font_size,
            bold: false,
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    fn height(&self) -> f32 {
        (self.top - self.bottom).max(0.1)
    }

    fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// All glyphs of one page plus its size.
#[derive(Debug, Clone, Default)]
pub struct PageText {
    /// 1-indexed page number.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub glyphs: Vec<Glyph>,
}

/// A run of glyphs with no word gap inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
    pub font_size: f32,
    pub bold: bool,
}

impl Word {
    fn start(g: &Glyph) -> Self {
        Self {
            text: g.ch.to_string(),
            left: g.left,
            bottom: g.bottom,
            right: g.right,
            top: g.top,
            font_size: g.font_size,
            bold: g.bold,
        }
    }

    fn push(&mut self, g: &Glyph) {
        self.text.push(g.ch);
        self.left = self.left.min(g.left);
        self.right = self.right.max(g.right);
        self.bottom = self.bottom.min(g.bottom);
        self.top = self.top.max(g.top);
        self.font_size = self.font_size.max(g.font_size);
        self.bold &= g.bold;
    }
}

/// Words sharing a baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    pub fn left(&self) -> f32 {
        self.words.iter().map(|w| w.left).fold(f32::MAX, f32::min)
    }

    pub fn right(&self) -> f32 {
        self.words.iter().map(|w| w.right).fold(f32::MIN, f32::max)
    }

    pub fn top(&self) -> f32 {
        self.words.iter().map(|w| w.top).fold(f32::MIN, f32::max)
    }

    pub fn bottom(&self) -> f32 {
        self.words.iter().map(|w| w.bottom).fold(f32::MAX, f32::min)
    }

    /// Largest font size on the line.
    pub fn font_size(&self) -> f32 {
        self.words.iter().map(|w| w.font_size).fold(0.0, f32::max)
    }

    pub fn bold(&self) -> bool {
        self.words.iter().all(|w| w.bold)
    }

    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split the line into cells wherever the gap between two words exceeds
    /// `gap_em` ems.
    pub fn cells(&self, gap_em: f32) -> Vec<Cell> {
        let mut cells: Vec<Cell> = Vec::new();
        for word in &self.words {
            match cells.last_mut() {
                Some(cell) if word.left - cell.right <= gap_em * word.font_size.max(1.0) => {
                    cell.text.push(' ');
                    cell.text.push_str(&word.text);
                    cell.right = cell.right.max(word.right);
                }
                _ => cells.push(Cell {
                    text: word.text.clone(),
                    left: word.left,
                    right: word.right,
                }),
            }
        }
        cells
    }
}

/// A horizontal slice of a line, candidate table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub left: f32,
    pub right: f32,
}

impl Cell {
    fn center(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// Role of a paragraph in the reconstructed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading with level 1 (largest) or 2.
    Heading(u8),
    Body,
}

/// A run of lines that reads as one block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub kind: BlockKind,
    pub font_size: f32,
    pub bold: bool,
    pub centered: bool,
}

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// 1-indexed page the table was found on.
    pub page: usize,
    /// Row-major cells; every row has the same length.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

// ── Lines ────────────────────────────────────────────────────────────────

struct Band<'a> {
    center: f32,
    height: f32,
    glyphs: Vec<&'a Glyph>,
}

/// Group a page's glyphs into lines, top of the page first.
pub fn build_lines(glyphs: &[Glyph]) -> Vec<Line> {
    let mut sorted: Vec<&Glyph> = glyphs
        .iter()
        .filter(|g| g.right > g.left && g.top > g.bottom)
        .collect();
    sorted.sort_by(|a, b| b.center_y().total_cmp(&a.center_y()));

    let mut bands: Vec<Band<'_>> = Vec::new();
    for g in sorted {
        match bands.last_mut() {
            Some(band) if (band.center - g.center_y()).abs() <= 0.5 * band.height.max(g.height()) => {
                let n = band.glyphs.len() as f32;
                band.center = (band.center * n + g.center_y()) / (n + 1.0);
                band.height = band.height.max(g.height());
                band.glyphs.push(g);
            }
            _ => bands.push(Band {
                center: g.center_y(),
                height: g.height(),
                glyphs: vec![g],
            }),
        }
    }

    bands
        .into_iter()
        .filter_map(|mut band| {
            band.glyphs.sort_by(|a, b| a.left.total_cmp(&b.left));
            let words = words_in_band(&band.glyphs);
            (!words.is_empty()).then_some(Line { words })
        })
        .collect()
}

fn words_in_band(glyphs: &[&Glyph]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Option<Word> = None;

    for g in glyphs {
        if g.ch.is_whitespace() {
            words.extend(current.take());
            continue;
        }
        if let Some(ref w) = current {
            if g.left - w.right > WORD_GAP_EM * w.font_size.max(g.font_size).max(1.0) {
                words.extend(current.take());
            }
        }
        match current.as_mut() {
            Some(w) => w.push(g),
            None => current = Some(Word::start(g)),
        }
    }
    words.extend(current);
    words
}

// ── Paragraphs ───────────────────────────────────────────────────────────

/// Median glyph font size over all pages; the size of body text.
pub fn body_font_size(pages: &[PageText]) -> f32 {
    let mut sizes: Vec<f32> = pages
        .iter()
        .flat_map(|p| p.glyphs.iter())
        .filter(|g| !g.ch.is_whitespace() && g.font_size > 0.0)
        .map(|g| g.font_size)
        .collect();
    if sizes.is_empty() {
        return 12.0;
    }
    sizes.sort_by(|a, b| a.total_cmp(b));
    sizes[sizes.len() / 2]
}

fn same_size(a: f32, b: f32) -> bool {
    (a - b).abs() <= SIZE_TOLERANCE * a.max(b)
}

fn is_centered(line: &Line, page_width: f32) -> bool {
    if page_width <= 0.0 {
        return false;
    }
    let mid = (line.left() + line.right()) / 2.0;
    let width = line.right() - line.left();
    (mid - page_width / 2.0).abs() < 0.04 * page_width && width < 0.8 * page_width
}

/// Merge lines into paragraphs and classify headings against `body_size`.
pub fn build_paragraphs(lines: &[Line], page_width: f32, body_size: f32) -> Vec<Paragraph> {
    let text_right = lines.iter().map(Line::right).fold(f32::MIN, f32::max);
    let mut groups: Vec<Vec<&Line>> = Vec::new();

    for line in lines {
        let starts_new = match groups.last().and_then(|g| g.last()) {
            None => true,
            Some(prev) => {
                let em = prev.font_size().max(1.0);
                let gap = prev.bottom() - line.top();
                gap > PARAGRAPH_GAP_EM * em
                    || !same_size(prev.font_size(), line.font_size())
                    || prev.bold() != line.bold()
                    || line.left() - prev.left() > em
                    || prev.right() < text_right - 5.0 * em
            }
        };
        if starts_new {
            groups.push(vec![line]);
        } else if let Some(group) = groups.last_mut() {
            group.push(line);
        }
    }

    groups
        .into_iter()
        .filter_map(|group| {
            let text = group
                .iter()
                .fold(String::new(), |acc, line| join_line(&acc, &line.text()));
            let text = clean_text(&text);
            if text.is_empty() {
                return None;
            }
            let font_size = group.iter().map(|l| l.font_size()).fold(0.0, f32::max);
            let ratio = font_size / body_size.max(1.0);
            let kind = if ratio >= 1.6 {
                BlockKind::Heading(1)
            } else if ratio >= 1.2 {
                BlockKind::Heading(2)
            } else {
                BlockKind::Body
            };
            Some(Paragraph {
                text,
                kind,
                font_size,
                bold: group.iter().all(|l| l.bold()),
                centered: group.iter().all(|l| is_centered(l, page_width)),
            })
        })
        .collect()
}

// ── Tables ───────────────────────────────────────────────────────────────

/// Find tables on one page.
///
/// A table is a run of at least `min_rows` consecutive lines that each split
/// into two or more cells, with no vertical gap larger than [`ROW_GAP_EM`]
/// between rows. Columns are the union of the cells' horizontal extents;
/// a block whose cells collapse into a single column is not a table.
pub fn detect_tables(page: &PageText, lines: &[Line], min_rows: usize, gap_em: f32) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut block: Vec<(&Line, Vec<Cell>)> = Vec::new();

    for line in lines {
        let cells = line.cells(gap_em);
        let continues = match block.last() {
            Some((prev, _)) => prev.bottom() - line.top() <= ROW_GAP_EM * prev.font_size().max(1.0),
            None => true,
        };
        if cells.len() >= 2 && continues {
            block.push((line, cells));
            continue;
        }
        flush_block(page.number, &mut block, min_rows, &mut tables);
        if cells.len() >= 2 {
            block.push((line, cells));
        }
    }
    flush_block(page.number, &mut block, min_rows, &mut tables);
    tables
}

fn flush_block(
    page: usize,
    block: &mut Vec<(&Line, Vec<Cell>)>,
    min_rows: usize,
    tables: &mut Vec<Table>,
) {
    if block.len() >= min_rows {
        if let Some(table) = grid_from_block(page, block) {
            tables.push(table);
        }
    }
    block.clear();
}

fn grid_from_block(page: usize, block: &[(&Line, Vec<Cell>)]) -> Option<Table> {
    let mut extents: Vec<(f32, f32)> = block
        .iter()
        .flat_map(|(_, cells)| cells.iter().map(|c| (c.left, c.right)))
        .collect();
    extents.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut columns: Vec<(f32, f32)> = Vec::new();
    for (left, right) in extents {
        match columns.last_mut() {
            Some(col) if left <= col.1 => col.1 = col.1.max(right),
            _ => columns.push((left, right)),
        }
    }
    if columns.len() < 2 {
        return None;
    }

    let rows = block
        .iter()
        .map(|(_, cells)| {
            let mut row = vec![String::new(); columns.len()];
            for cell in cells {
                let idx = column_for(&columns, cell.center());
                if !row[idx].is_empty() {
                    row[idx].push(' ');
                }
                row[idx].push_str(&clean_text(&cell.text));
            }
            row
        })
        .collect();

    Some(Table { page, rows })
}

fn column_for(columns: &[(f32, f32)], x: f32) -> usize {
    columns
        .iter()
        .position(|&(l, r)| x >= l && x <= r)
        .unwrap_or_else(|| {
            columns
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    let da = ((a.0 + a.1) / 2.0 - x).abs();
                    let db = ((b.0 + b.1) / 2.0 - x).abs();
                    da.total_cmp(&db)
                })
                .map_or(0, |(i, _)| i)
        })
}
