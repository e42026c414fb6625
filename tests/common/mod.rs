//! Shared helpers for the integration tests: fixture PDFs and a local bucket.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pdf_office_worker::{LocalStore, Worker, WorkerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const BUCKET: &str = "pdf-master-storage";

/// One piece of text placed at `(x, y)` in points, `size` pt Helvetica.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a> {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub text: &'a str,
}

pub fn text(x: f32, y: f32, text: &str) -> Text<'_> {
    Text {
        x,
        y,
        size: 12.0,
        text,
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Build a US-Letter PDF with one page per entry of `pages`.
pub fn build_pdf(pages: &[Vec<Text<'_>>]) -> Vec<u8> {
    save(build_document(pages))
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A PDF whose standard security handler accepts neither the empty user
/// password nor any password a test would pass: opening always needs the
/// (unknown) right one.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = build_document(&[vec![text(72.0, 700.0, "Confidential")]]);
    let hex = |byte: u8, len: usize| Object::String(vec![byte; len], StringFormat::Hexadecimal);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -44,
        "O" => hex(0x5a, 32),
        "U" => hex(0xa5, 32),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer
        .set("ID", vec![hex(0x11, 16), hex(0x11, 16)]);
    save(doc)
}

fn build_document(pages: &[Vec<Text<'_>>]) -> Document {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for items in pages {
        let content: String = items
            .iter()
            .map(|t| {
                format!(
                    "BT /F1 {} Tf 1 0 0 1 {} {} Tm ({}) Tj ET\n",
                    t.size,
                    t.x,
                    t.y,
                    escape(t.text)
                )
            })
            .collect();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        }));
    }

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|&id| Object::from(id)).collect::<Vec<_>>(),
        "Count" => page_ids.len() as i64,
    });
    for &id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(id) {
            dict.set("Parent", pages_id);
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// A two-page report: prose with a heading, then a price table.
pub fn report_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![
            Text {
                x: 72.0,
                y: 720.0,
                size: 24.0,
                text: "Quarterly Report",
            },
            text(72.0, 680.0, "Revenue grew steadily across all regions this quarter."),
            text(72.0, 666.0, "Costs were flat compared with last year."),
        ],
        vec![
            text(72.0, 700.0, "Item"),
            text(250.0, 700.0, "Qty"),
            text(400.0, 700.0, "Price"),
            text(72.0, 684.0, "Apples"),
            text(250.0, 684.0, "10"),
            text(400.0, 684.0, "1.50"),
            text(72.0, 668.0, "Pears"),
            text(250.0, 668.0, "7"),
            text(400.0, 668.0, "2.25"),
        ],
    ])
}

/// A temporary directory acting as the bucket.
pub struct LocalBucket {
    pub dir: TempDir,
}

impl LocalBucket {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn put(&self, key: &str, data: &[u8]) {
        let path = self.dir.path().join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.path().join(key)
    }

    pub fn worker(&self) -> Worker {
        let mut builder = WorkerConfig::builder().bucket(BUCKET);
        if let Some(lib) = pdfium_lib_path() {
            builder = builder.pdfium_lib_path(lib);
        }
        Worker::new(builder.build().unwrap(), Arc::new(LocalStore::new(self.root())))
    }
}

pub fn job(tool: &str, job_id: &str, key: &str) -> String {
    format!(
        r#"{{"tool":"{tool}","job_id":"{job_id}","files":["https://{BUCKET}.s3.amazonaws.com/{key}"]}}"#
    )
}

pub fn pdfium_lib_path() -> Option<PathBuf> {
    std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from)
}

pub fn pdfium_available() -> bool {
    pdf_office_worker::pipeline::document::bind_pdfium(pdfium_lib_path().as_deref()).is_ok()
}

/// Skip this test if no PDFium library can be bound.
macro_rules! skip_unless_pdfium {
    () => {{
        if !common::pdfium_available() {
            println!("SKIP — pdfium library not found (set PDFIUM_LIB_PATH)");
            return;
        }
    }};
}
