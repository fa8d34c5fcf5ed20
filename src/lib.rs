//! # gemini-share-pdf
//!
//! Submit a Gemini share link to a conversion server and deliver the PDF it
//! returns.
//!
//! The conversion (scraping the shared chat, rendering the PDF) happens on
//! the server. This crate is the client: it validates the pasted link, sends
//! `POST /convert`, tells a file payload apart from a JSON error, and hands
//! the file to a download target. A small UI state machine keeps exactly one
//! attempt in flight.
//!
//! ## Flow
//!
//! ```text
//! pasted text
//!  │
//!  ├─ 1. Validate  trim, non-empty, share-link prefix     (request)
//!  ├─ 2. Busy      clear message, disable trigger         (ui)
//!  ├─ 3. POST      {"url": ...} to /convert               (client)
//!  ├─ 4. Interpret file + Content-Disposition, or error   (outcome, disposition)
//!  ├─ 5. Deliver   hand bytes to the DownloadTarget       (download)
//!  └─ 6. Idle      always, via a drop guard               (controller)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_share_pdf::{ClientConfig, ConversionController, DirectoryTarget, NoopSurface};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://127.0.0.1:5000")
//!         .build()?;
//!     let mut controller =
//!         ConversionController::new(config, NoopSurface, DirectoryTarget::new("."))?;
//!     let result = controller
//!         .attempt_conversion("https://g.co/gemini/share/abc123")
//!         .await;
//!     println!("{result:?}: {}", controller.state().message.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gemini-pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! gemini-share-pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod controller;
pub mod disposition;
pub mod download;
pub mod error;
pub mod outcome;
pub mod request;
pub mod ui;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::ConvertClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_FILENAME, DEFAULT_SHARE_PREFIX};
pub use controller::{AttemptResult, ConversionController, DOWNLOAD_STARTED_MESSAGE};
pub use disposition::{filename_from_disposition, resolve_filename};
pub use download::{safe_filename, DirectoryTarget, DownloadTarget};
pub use error::{ClientError, ValidationError, NETWORK_ERROR_MESSAGE};
pub use outcome::{interpret_response, ConversionOutcome};
pub use request::ConversionRequest;
pub use ui::{Message, NoopSurface, Phase, Tone, UiState, UiSurface};
