//! PDFium binding and document loading.
//!
//! ## Where does libpdfium come from?
//!
//! In order: an explicit path from the configuration (`--pdfium-lib` /
//! `PDFIUM_LIB_PATH`), which may name the library file itself or the
//! directory holding it; then the current directory; then the system
//! library search path. A binding failure is a per-job error like any
//! other, so the caller still gets a well-formed envelope.
//!
//! A `Pdfium` handle is not `Send`, so each conversion binds its own on the
//! blocking thread that uses it and drops it there.

use crate::error::WorkerError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bind to a PDFium library.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, WorkerError> {
    let bindings = match lib_path {
        Some(path) => {
            let lib = if path.is_dir() {
                PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(path))
            } else {
                path.to_path_buf()
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| WorkerError::PdfiumBindingFailed(e.to_string()))?;

    Ok(Pdfium::new(bindings))
}

/// Open the PDF at `path`, mapping pdfium's load errors onto the
/// password and corruption variants.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, WorkerError> {
    let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                WorkerError::WrongPassword {
                    path: path.to_path_buf(),
                }
            } else {
                WorkerError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            }
        } else {
            WorkerError::CorruptPdf {
                path: path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    debug!("PDF loaded: {} pages", document.pages().len());
    Ok(document)
}
