//! Pipeline stages for one conversion job.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets the
//! three converters in [`crate::convert`] share the PDF-facing ones.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ document ──┬──▶ text ──▶ layout ──▶ postprocess ──▶ (docx / xlsx)
//! (fetch)   (pdfium)   └──▶ render ──▶ encode ──────────────────▶ (pptx)
//!                                                                   │
//!                                                         publish ◀─┘
//! ```
//!
//! 1. [`input`]    — download `files[0]` into the job's staging directory
//! 2. [`document`] — bind pdfium and open the staged PDF
//! 3. [`text`]     — positioned characters of every page
//! 4. [`layout`]   — lines, paragraphs and tables from glyph geometry
//! 5. [`postprocess`] — deterministic text-cleanup rules
//! 6. [`render`]   — rasterise pages; pdfium is not async-safe, so callers
//!    run it in `spawn_blocking`
//! 7. [`encode`]   — PNG-encode each rendered page
//! 8. [`publish`]  — upload the output and build its URL

pub mod document;
pub mod encode;
pub mod input;
pub mod layout;
pub mod postprocess;
pub mod publish;
pub mod render;
pub mod text;
