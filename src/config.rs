//! Configuration types for the conversion worker.
//!
//! Everything the worker needs to know about its environment — which bucket
//! it serves, where outputs go, how pages are rasterised and how tables are
//! detected — lives in [`WorkerConfig`], built via [`WorkerConfigBuilder`].
//! Nothing is read from globals: the binary maps CLI flags and environment
//! variables onto the builder, and tests build configs directly.

use crate::error::WorkerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bucket served when none is configured.
pub const DEFAULT_BUCKET: &str = "pdf-master-storage";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Key prefix for published documents.
pub const DEFAULT_OUTPUT_PREFIX: &str = "processed/";

/// Configuration for one worker invocation.
///
/// # Example
/// ```rust
/// use pdf_office_worker::{SlideSize, WorkerConfig};
///
/// let config = WorkerConfig::builder()
///     .bucket("my-bucket")
///     .dpi(200)
///     .slide_size(SlideSize::Widescreen)
///     .build()
///     .unwrap();
/// assert_eq!(config.bucket, "my-bucket");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Bucket the worker reads inputs from and publishes outputs to.
    pub bucket: String,

    /// Storage region. Default: `us-east-1`.
    pub region: String,

    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    pub endpoint_url: Option<String>,

    /// Use path-style addressing (`{endpoint}/{bucket}/{key}`). Required by
    /// most S3-compatible stores. Default: false.
    pub force_path_style: bool,

    /// Prefix of published keys. Always empty or ending in `/`. Default: `processed/`.
    pub output_prefix: String,

    /// Rasterisation DPI for slide images. Range: 72–400. Default: 150.
    pub dpi: u32,

    /// Cap on the longest edge of a rasterised page, in pixels. Default: 2000.
    ///
    /// Applied after DPI scaling, so an oversized page is shrunk rather
    /// than allocated at full resolution.
    pub max_rendered_pixels: u32,

    /// Slide dimensions of generated presentations. Default: 4:3.
    pub slide_size: SlideSize,

    /// Minimum consecutive multi-cell lines that form a table. Default: 2.
    pub min_table_rows: usize,

    /// Horizontal gap, in multiples of the font size, that separates two
    /// table cells on one line. Default: 1.2.
    pub column_gap_em: f32,

    /// Explicit pdfium library file, or a directory containing it.
    /// When `None` the system library search path is used.
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            force_path_style: false,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            dpi: 150,
            max_rendered_pixels: 2000,
            slide_size: SlideSize::default(),
            min_table_rows: 2,
            column_gap_em: 1.2,
            pdfium_lib_path: None,
        }
    }
}

impl WorkerConfig {
    /// Create a new builder for `WorkerConfig`.
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`WorkerConfig`].
#[derive(Debug)]
pub struct WorkerConfigBuilder {
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint_url = Some(url.into());
        self
    }

    pub fn force_path_style(mut self, v: bool) -> Self {
        self.config.force_path_style = v;
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.output_prefix = prefix.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn slide_size(mut self, size: SlideSize) -> Self {
        self.config.slide_size = size;
        self
    }

    pub fn min_table_rows(mut self, rows: usize) -> Self {
        self.config.min_table_rows = rows;
        self
    }

    pub fn column_gap_em(mut self, em: f32) -> Self {
        self.config.column_gap_em = em.clamp(0.3, 10.0);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<WorkerConfig, WorkerError> {
        let c = &mut self.config;
        if c.bucket.trim().is_empty() {
            return Err(WorkerError::InvalidConfig("bucket must not be empty".into()));
        }
        if c.bucket.contains('/') {
            return Err(WorkerError::InvalidConfig(format!(
                "bucket must be a bare bucket name, got '{}'",
                c.bucket
            )));
        }
        if c.dpi < 72 || c.dpi > 400 {
            return Err(WorkerError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.min_table_rows < 2 {
            return Err(WorkerError::InvalidConfig(format!(
                "a table needs at least 2 rows, got min_table_rows = {}",
                c.min_table_rows
            )));
        }
        if !c.output_prefix.is_empty() && !c.output_prefix.ends_with('/') {
            c.output_prefix.push('/');
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Slide dimensions of generated presentations, in EMU (914 400 per inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideSize {
    /// 10 × 7.5 in, the classic on-screen show size. (default)
    #[default]
    Standard,
    /// 13.333 × 7.5 in.
    Widescreen,
}

impl SlideSize {
    /// `(width, height)` in EMU.
    pub fn emu(self) -> (u64, u64) {
        match self {
            SlideSize::Standard => (9_144_000, 6_858_000),
            SlideSize::Widescreen => (12_192_000, 6_858_000),
        }
    }

    /// Value of the `type` attribute of `<p:sldSz>`.
    pub fn ooxml_type(self) -> &'static str {
        match self {
            SlideSize::Standard => "screen4x3",
            SlideSize::Widescreen => "custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_processed_prefix() {
        let c = WorkerConfig::default();
        assert_eq!(c.bucket, "pdf-master-storage");
        assert_eq!(c.output_prefix, "processed/");
        assert_eq!(c.dpi, 150);
    }

    #[test]
    fn build_rejects_empty_bucket() {
        let err = WorkerConfig::builder().bucket("  ").build().unwrap_err();
        assert!(matches!(err, WorkerError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_bucket_with_slash() {
        assert!(WorkerConfig::builder().bucket("a/b").build().is_err());
    }

    #[test]
    fn build_rejects_dpi_out_of_range() {
        assert!(WorkerConfig::builder().dpi(50).build().is_err());
        assert!(WorkerConfig::builder().dpi(401).build().is_err());
        assert!(WorkerConfig::builder().dpi(72).build().is_ok());
    }

    #[test]
    fn build_rejects_single_row_tables() {
        assert!(WorkerConfig::builder().min_table_rows(1).build().is_err());
    }

    #[test]
    fn output_prefix_gets_trailing_slash() {
        let c = WorkerConfig::builder().output_prefix("out").build().unwrap();
        assert_eq!(c.output_prefix, "out/");
        let c = WorkerConfig::builder().output_prefix("").build().unwrap();
        assert_eq!(c.output_prefix, "");
    }

    #[test]
    fn slide_sizes() {
        assert_eq!(SlideSize::Standard.emu(), (9_144_000, 6_858_000));
        assert_eq!(SlideSize::Widescreen.emu().0, 12_192_000);
    }
}
