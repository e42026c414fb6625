//! CLI binary for pdf-office-worker.
//!
//! A thin shim over the library crate: maps CLI flags and environment
//! variables to `WorkerConfig`, picks an object store, runs one job and
//! prints its envelope. Logs go to stderr; stdout carries exactly one JSON
//! object.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_office_worker::config::{DEFAULT_BUCKET, DEFAULT_OUTPUT_PREFIX, DEFAULT_REGION};
use pdf_office_worker::{
    LocalStore, ObjectStore, ResultEnvelope, S3Store, SlideSize, Worker, WorkerConfig,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"JOB FORMAT (stdin):
  {"tool": "pdf-to-word" | "pdf-to-excel" | "pdf-to-ppt",
   "job_id": "job1",
   "files": ["https://<bucket>.s3.amazonaws.com/<key>"],
   "options": {"password": "..."}}            (options optional)

OUTPUT (stdout, exactly one line):
  {"status":"completed","url":"https://<bucket>.s3.amazonaws.com/processed/job1.docx"}   exit 0
  {"status":"error","error":"<message>"}                                                exit 1

EXAMPLES:
  # Convert a PDF stored in the default bucket
  echo '{"tool":"pdf-to-word","job_id":"job1","files":["https://pdf-master-storage.s3.amazonaws.com/in1.pdf"]}' \
    | office-worker

  # Against MinIO
  office-worker --endpoint-url http://localhost:9000 --force-path-style --job job.json

  # Use a local directory as the bucket
  office-worker --local-storage ./bucket < job.json

ENVIRONMENT VARIABLES:
  AWS_S3_BUCKET           Bucket to read from and publish to
  AWS_REGION              Bucket region
  AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_PROFILE
                          Credentials (standard AWS provider chain)
  PDFIUM_LIB_PATH         libpdfium file, or the directory containing it
  RUST_LOG                Overrides --verbose / --quiet log filtering
"#;

/// Convert one PDF job from object storage to Word, Excel or PowerPoint.
#[derive(Parser, Debug)]
#[command(
    name = "office-worker",
    version,
    about = "Convert one PDF job from object storage to Word, Excel or PowerPoint",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Read the job from this file instead of stdin.
    #[arg(long, env = "OFFICE_WORKER_JOB")]
    job: Option<PathBuf>,

    /// Bucket holding source PDFs and published outputs.
    #[arg(long, env = "AWS_S3_BUCKET", default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Bucket region.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Custom S3-compatible endpoint (MinIO, LocalStack, …).
    #[arg(long, env = "OFFICE_WORKER_S3_ENDPOINT")]
    endpoint_url: Option<String>,

    /// Use path-style addressing (required by most S3-compatible stores).
    #[arg(long, env = "OFFICE_WORKER_S3_PATH_STYLE")]
    force_path_style: bool,

    /// Key prefix of published documents.
    #[arg(long, env = "OFFICE_WORKER_OUTPUT_PREFIX", default_value = DEFAULT_OUTPUT_PREFIX)]
    output_prefix: String,

    /// Rasterisation DPI for pdf-to-ppt (72–400).
    #[arg(long, env = "OFFICE_WORKER_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Longest edge of a rendered slide image, in pixels.
    #[arg(long, env = "OFFICE_WORKER_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// Slide size of generated presentations.
    #[arg(long, env = "OFFICE_WORKER_SLIDE_SIZE", value_enum, default_value = "standard")]
    slide_size: SlideSizeArg,

    /// Minimum number of rows for a block of lines to count as a table.
    #[arg(long, default_value_t = 2)]
    min_table_rows: usize,

    /// Horizontal gap, in ems, that separates two table cells.
    #[arg(long, default_value_t = 1.2)]
    column_gap: f32,

    /// libpdfium file, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Use this directory as the bucket instead of S3.
    #[arg(long, env = "OFFICE_WORKER_LOCAL_STORAGE")]
    local_storage: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OFFICE_WORKER_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "OFFICE_WORKER_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SlideSizeArg {
    /// 4:3
    #[value(alias = "4:3")]
    Standard,
    /// 16:9
    #[value(alias = "16:9")]
    Widescreen,
}

impl From<SlideSizeArg> for SlideSize {
    fn from(v: SlideSizeArg) -> Self {
        match v {
            SlideSizeArg::Standard => SlideSize::Standard,
            SlideSizeArg::Widescreen => SlideSize::Widescreen,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return argument_error(e),
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // Start-up failures still go out as an envelope.
    let envelope = match run(cli).await {
        Ok(envelope) => envelope,
        Err(e) => ResultEnvelope::Error {
            error: format!("{:#}", e),
        },
    };

    println!("{}", envelope.to_json());
    envelope.exit_code()
}

/// Help and version go out as clap prints them; anything else is a failed
/// job and still gets an envelope.
fn argument_error(e: clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    if matches!(
        e.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        e.exit();
    }

    let _ = e.print();
    let rendered = e.to_string();
    let summary = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .trim();
    let envelope = ResultEnvelope::Error {
        error: format!("invalid arguments: {}", summary),
    };
    println!("{}", envelope.to_json());
    envelope.exit_code()
}

async fn run(cli: Cli) -> Result<ResultEnvelope> {
    let input = read_job(cli.job.as_deref())?;
    let config = build_config(&cli)?;

    let store: Arc<dyn ObjectStore> = match cli.local_storage {
        Some(root) => Arc::new(LocalStore::new(root)),
        None => Arc::new(S3Store::from_config(&config).await),
    };

    Ok(Worker::new(config, store).run(&input).await)
}

fn read_job(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read job file {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read job from stdin")?;
            Ok(buf)
        }
    }
}

fn build_config(cli: &Cli) -> Result<WorkerConfig> {
    let mut builder = WorkerConfig::builder()
        .bucket(cli.bucket.as_str())
        .region(cli.region.as_str())
        .force_path_style(cli.force_path_style)
        .output_prefix(cli.output_prefix.as_str())
        .dpi(cli.dpi)
        .max_rendered_pixels(cli.max_pixels)
        .slide_size(cli.slide_size.into())
        .min_table_rows(cli.min_table_rows)
        .column_gap_em(cli.column_gap);

    if let Some(ref url) = cli.endpoint_url {
        builder = builder.endpoint_url(url.as_str());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib.clone());
    }

    Ok(builder.build()?)
}
