//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why a callback instead of a Vec?
//!
//! A 200-page deck at 150 DPI is several gigabytes of RGBA. Pages are
//! handed to the caller one at a time so it can PNG-encode and drop each
//! bitmap before the next one is rendered.
//!
//! ## Why cap pixels as well as DPI?
//!
//! Page sizes vary wildly: an A0 poster at 150 DPI would produce a
//! 7,000 × 10,000 px image. `max_rendered_pixels` caps the longest edge
//! regardless of physical size, keeping memory bounded; slides are displayed
//! on screens, so nothing is lost.

use crate::error::WorkerError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::debug;

/// Render every page at `dpi`, capped at `max_pixels` on the longest edge,
/// passing `(page_number_1based, image)` to `on_page` in page order.
///
/// Blocking: call from `spawn_blocking`.
pub fn render_each_page<F>(
    document: &PdfDocument<'_>,
    dpi: u32,
    max_pixels: u32,
    mut on_page: F,
) -> Result<usize, WorkerError>
where
    F: FnMut(usize, DynamicImage) -> Result<(), WorkerError>,
{
    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(dpi as f32 / 72.0)
        .set_maximum_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut rendered = 0;
    for (index, page) in document.pages().iter().enumerate() {
        let number = index + 1;
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| WorkerError::conversion("pdf-to-ppt", format!("page {}: {}", number, e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            number,
            image.width(),
            image.height()
        );
        on_page(number, image)?;
        rendered += 1;
    }

    Ok(rendered)
}
