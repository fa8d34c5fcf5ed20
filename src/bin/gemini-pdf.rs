//! CLI binary for gemini-share-pdf.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! renders the controller's UI state on the terminal and saves downloads
//! into a directory.

use anyhow::{Context, Result};
use clap::Parser;
use gemini_share_pdf::{
    AttemptResult, ClientConfig, ConversionController, DirectoryTarget, Message, Tone, UiSurface,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal UI surface ──────────────────────────────────────────────────────

/// The terminal stand-in for the page: stderr is the message area and a
/// spinner replaces the button label while a conversion is busy.
struct TerminalSurface {
    spinner: Option<ProgressBar>,
    quiet: bool,
}

impl TerminalSurface {
    fn new(quiet: bool) -> Self {
        Self {
            spinner: None,
            quiet,
        }
    }
}

impl UiSurface for TerminalSurface {
    fn show_message(&mut self, message: &Message) {
        if message.is_empty() || (self.quiet && message.tone != Tone::Error) {
            return;
        }
        let line = match message.tone {
            Tone::Success => format!("{} {}", green("✔"), message.text),
            Tone::Error => format!("{} {}", red("✘"), message.text),
            Tone::Neutral => message.text.clone(),
        };
        match self.spinner {
            Some(ref bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if !busy {
            if let Some(bar) = self.spinner.take() {
                bar.finish_and_clear();
            }
            return;
        }
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.set_message("waiting for the server…");
        bar.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(bar);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one share link into the current directory
  gemini-pdf https://g.co/gemini/share/abc123

  # Save into ~/Downloads, talking to a remote conversion server
  gemini-pdf --server https://pdf.example.com -o ~/Downloads https://g.co/gemini/share/abc123

  # Interactive: paste one link per line, Ctrl-D to quit
  gemini-pdf

  # Batch from a file (attempts run one after another)
  gemini-pdf < links.txt

SERVER CONTRACT:
  Request   POST <server>/convert   Content-Type: application/json   {"url": "..."}
  Success   2xx, body = PDF, optional Content-Disposition: attachment; filename="..."
  Failure   non-2xx, body = {"error": "..."}

ENVIRONMENT VARIABLES:
  GEMINI_PDF_SERVER       Conversion server origin (default http://127.0.0.1:5000)
  GEMINI_PDF_OUTPUT_DIR   Download directory (default .)
  GEMINI_PDF_TIMEOUT      Whole-request timeout in seconds (default: none)
  RUST_LOG                Override log filter (e.g. gemini_share_pdf=debug)
"#;

/// Convert Gemini share links to PDF through a conversion server.
#[derive(Parser, Debug)]
#[command(
    name = "gemini-pdf",
    version,
    about = "Convert Gemini share links to PDF through a conversion server",
    long_about = "Send a Gemini share link to a conversion server's /convert endpoint and \
save the PDF it returns. With no URL argument, reads one link per line from stdin.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Share link (https://g.co/gemini/share/...). Reads stdin when omitted.
    url: Option<String>,

    /// Directory to save downloads into.
    #[arg(short, long, env = "GEMINI_PDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Conversion server origin.
    #[arg(long, env = "GEMINI_PDF_SERVER", default_value = gemini_share_pdf::config::DEFAULT_BASE_URL)]
    server: String,

    /// Endpoint path on the server.
    #[arg(long, env = "GEMINI_PDF_ENDPOINT", default_value = gemini_share_pdf::config::DEFAULT_ENDPOINT_PATH)]
    endpoint: String,

    /// Whole-request timeout in seconds. Default: wait indefinitely.
    #[arg(long, env = "GEMINI_PDF_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// TCP connect timeout in seconds.
    #[arg(long, env = "GEMINI_PDF_CONNECT_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout: Option<u64>,

    /// Filename used when the server does not suggest one.
    #[arg(long, env = "GEMINI_PDF_DEFAULT_FILENAME", default_value = gemini_share_pdf::DEFAULT_FILENAME)]
    default_filename: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GEMINI_PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GEMINI_PDF_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The message area already tells the user what happened; library logs
    // only surface at WARN unless asked for.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let target = DirectoryTarget::new(&cli.output_dir);
    let mut controller = ConversionController::new(config, TerminalSurface::new(cli.quiet), target)
        .context("Failed to initialise HTTP client")?;

    // ── Single attempt ───────────────────────────────────────────────────
    if let Some(ref url) = cli.url {
        let result = controller.attempt_conversion(url).await;
        report(&controller, &result);
        return Ok(if result.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // ── Interactive / batch ──────────────────────────────────────────────
    let interactive = io::stdin().is_terminal();
    if interactive && !cli.quiet {
        eprintln!(
            "{} {}",
            bold("Paste a Gemini share link and press Enter."),
            dim(&format!("(server {}, Ctrl-D to quit)", controller.config().base_url))
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut failures = 0usize;
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        // Blank lines only get the "paste a URL" hint when a person is typing.
        if !interactive && line.trim().is_empty() {
            continue;
        }
        let result = controller.attempt_conversion(&line).await;
        report(&controller, &result);
        if !result.is_success() {
            failures += 1;
        }
    }

    Ok(if failures == 0 || interactive {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print where a download landed; the surface has already shown the message.
fn report(controller: &ConversionController<TerminalSurface, DirectoryTarget>, result: &AttemptResult) {
    if let AttemptResult::Downloaded { filename, size } = result {
        let path = controller.downloads().path_for(filename);
        println!("{}", path.display());
        if !controller.ui().quiet {
            eprintln!("  {}", dim(&format!("{size} bytes")));
        }
    }
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder()
        .base_url(cli.server.clone())
        .endpoint_path(cli.endpoint.clone())
        .default_filename(cli.default_filename.clone());

    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(secs) = cli.connect_timeout {
        builder = builder.connect_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}
