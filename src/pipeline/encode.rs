//! Image encoding: `DynamicImage` → PNG bytes for embedding in a package.
//!
//! PNG is chosen over JPEG because it is lossless — rendered text stays
//! crisp on a slide that may be projected at many times its original size.

use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}
