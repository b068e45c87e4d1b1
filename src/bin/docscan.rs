//! CLI binary for docscan.
//!
//! A thin shim over the library crate: maps CLI flags to `ScanConfig`,
//! drives one `ScanForm` select + submit, and prints the result panels.

use anyhow::{Context, Result};
use clap::Parser;
use docscan::{ScanConfig, ScanError, ScanForm, ScanObserver, UiState, DEFAULT_ENDPOINT_URL};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Busy indicator ───────────────────────────────────────────────────────────

/// Shows a spinner for as long as the form is `Loading`.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Scanning");
        Arc::new(Self { bar })
    }
}

impl ScanObserver for SpinnerObserver {
    fn on_state_change(&self, state: &UiState) {
        match state {
            UiState::Loading => {
                self.bar.set_draw_target(ProgressDrawTarget::stderr());
                self.bar.set_message("Processing…");
                self.bar.enable_steady_tick(Duration::from_millis(80));
            }
            UiState::Result(_) | UiState::Error(_) => self.bar.finish_and_clear(),
            UiState::Idle => {}
        }
    }

    fn on_first_page_only(&self, page_count: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("⚠"),
            dim(&format!("PDF has {page_count} pages; only the first page is scanned"))
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan a photo
  docscan receipt.jpg

  # Scan the first page of a PDF
  docscan contract.pdf

  # JSON output
  docscan --json invoice.pdf > result.json

  # Use a different OCR endpoint
  docscan --endpoint http://localhost:8080/api/webapp/v0/getDocScanned scan.jpeg

ENVIRONMENT VARIABLES:
  DOCSCAN_ENDPOINT    OCR endpoint URL
  PDFIUM_LIB_PATH     Path to libpdfium (file or containing directory)
  RUST_LOG            Overrides the log filter
"#;

/// Scan a JPG or PDF with the document OCR service.
#[derive(Parser, Debug)]
#[command(
    name = "docscan",
    version,
    about = "Scan a JPG or PDF with a document OCR service",
    long_about = "Upload a JPG, or the first page of a PDF rendered to JPEG, to a document \
OCR service and print the caption, confidence and extracted text it returns.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JPG or PDF file to scan.
    input: PathBuf,

    /// OCR endpoint receiving the upload.
    #[arg(long, env = "DOCSCAN_ENDPOINT", default_value = DEFAULT_ENDPOINT_URL)]
    endpoint: String,

    /// pdfium library file, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// PDF render scale relative to the page's native size.
    #[arg(long, env = "DOCSCAN_RENDER_SCALE", default_value_t = 1.5)]
    scale: f32,

    /// JPEG quality for converted PDF pages (1–100).
    #[arg(long, env = "DOCSCAN_JPEG_QUALITY", default_value_t = 90,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Request timeout in seconds. No timeout when unset.
    #[arg(long, env = "DOCSCAN_TIMEOUT")]
    timeout: Option<u64>,

    /// Declared media type, instead of deriving it from the extension.
    #[arg(long, env = "DOCSCAN_MEDIA_TYPE")]
    media_type: Option<String>,

    /// Print the OCR result as JSON.
    #[arg(long, env = "DOCSCAN_JSON")]
    json: bool,

    /// Disable the busy spinner.
    #[arg(long, env = "DOCSCAN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCSCAN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "DOCSCAN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters, so library INFO logs
    // are muted while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    let config = build_config(&cli, show_progress)?;
    let mut form = ScanForm::new(config).context("Invalid configuration")?;

    // ── Select ───────────────────────────────────────────────────────────
    match form.select_path(&cli.input, cli.media_type.as_deref()).await {
        Ok(file) => {
            if !cli.quiet && !cli.json {
                eprintln!("Selected: {}", bold(&file.name));
            }
        }
        Err(e @ ScanError::InvalidFileType { .. }) => {
            anyhow::bail!("{}", red(&e.user_message()));
        }
        Err(e) => return Err(e).context("Failed to read input file"),
    }

    // ── Submit ───────────────────────────────────────────────────────────
    match form.submit().await {
        Ok(result) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("Failed to serialise result")?
                );
            } else {
                print_panel("Caption", &result.caption_result);
                print_panel("Confidence", &result.confidence.to_string());
                print_panel("Extracted Text", &result.read_result);
            }
            Ok(())
        }
        // The library has already logged the detail; the banner is what the
        // form shows.
        Err(_) => match form.state() {
            UiState::Error(msg) => anyhow::bail!("{}", red(msg)),
            other => anyhow::bail!("Submission ended in unexpected state {other:?}"),
        },
    }
}

/// Map CLI args to `ScanConfig`.
fn build_config(cli: &Cli, show_progress: bool) -> Result<ScanConfig> {
    let mut builder = ScanConfig::builder()
        .endpoint_url(cli.endpoint.clone())
        .render_scale(cli.scale)
        .jpeg_quality(cli.quality);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.renderer_library_path(path.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if show_progress {
        builder = builder.observer(SpinnerObserver::new() as Arc<dyn ScanObserver>);
    }

    builder.build().context("Invalid configuration")
}

fn print_panel(title: &str, body: &str) {
    println!("{}", bold(&format!("── {title} ")));
    println!("{body}");
    println!();
}
