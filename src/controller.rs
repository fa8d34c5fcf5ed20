//! The conversion controller: one attempt from pasted text to terminal state.
//!
//! ```text
//! idle ──(trigger, link valid)──▶ busy ──(response settled, any outcome)──▶ idle
//!   ▲                                                                        │
//!   └──────────────── validation failure: stays idle ◀───────────────────────┘
//! ```
//!
//! The busy phase is held by a drop guard, so the trigger is re-enabled on
//! every exit path: normal return, a decoding failure, a failing download
//! target, a panic unwinding through the controller, or the attempt's
//! future being dropped while it waits on the network.

use crate::client::ConvertClient;
use crate::config::ClientConfig;
use crate::download::DownloadTarget;
use crate::error::{ClientError, ValidationError};
use crate::outcome::{interpret_response, ConversionOutcome};
use crate::request::ConversionRequest;
use crate::ui::{Message, Phase, UiState, UiSurface};
use tracing::{debug, error, info};

/// Shown once the download target has accepted the payload.
pub const DOWNLOAD_STARTED_MESSAGE: &str = "Download started successfully!";

/// What an attempt ended with, for hosts that need more than the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// Trigger fired while another attempt was busy; nothing happened.
    Ignored,
    /// Input failed validation; no request was sent.
    Rejected(ValidationError),
    /// The payload was handed to the download target.
    Downloaded { filename: String, size: usize },
    /// Server refusal, transport failure or download failure.
    Failed { message: String },
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Downloaded { .. })
    }
}

/// Drives conversions against one endpoint, rendering into `U` and
/// delivering files through `D`.
pub struct ConversionController<U, D> {
    config: ClientConfig,
    client: ConvertClient,
    state: UiState,
    ui: U,
    downloads: D,
}

impl<U: UiSurface, D: DownloadTarget> ConversionController<U, D> {
    pub fn new(config: ClientConfig, ui: U, downloads: D) -> Result<Self, ClientError> {
        let client = ConvertClient::new(&config)?;
        Ok(Self {
            config,
            client,
            state: UiState::new(),
            ui,
            downloads,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn downloads(&self) -> &D {
        &self.downloads
    }

    /// Give back the injected surface and download target.
    pub fn into_parts(self) -> (U, D) {
        (self.ui, self.downloads)
    }

    /// Run one conversion for whatever text is in the URL field.
    ///
    /// Validation failures return immediately without touching the network.
    /// Otherwise the message is cleared, the UI goes busy, the request is
    /// sent, and the outcome is rendered. The UI is idle again by the time
    /// this returns.
    pub async fn attempt_conversion(&mut self, raw_input: &str) -> AttemptResult {
        if self.state.is_busy() {
            debug!("Trigger fired while busy; ignoring");
            return AttemptResult::Ignored;
        }

        let request = match ConversionRequest::from_input(raw_input, &self.config.share_prefix) {
            Ok(request) => request,
            Err(rejection) => {
                let message = Message::error(rejection.to_string());
                self.ui.show_message(&message);
                self.state.message = message;
                return AttemptResult::Rejected(rejection);
            }
        };

        let mut busy = BusySession::enter(&mut self.state, &mut self.ui);
        info!("Converting {}", request.url());

        let outcome = match self.client.post_convert(&request).await {
            Ok(response) => interpret_response(response, &self.config.default_filename).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(ConversionOutcome::Success {
                file_bytes,
                filename,
            }) => match self.downloads.trigger_download(&file_bytes, &filename) {
                Ok(()) => {
                    busy.show(Message::success(DOWNLOAD_STARTED_MESSAGE));
                    AttemptResult::Downloaded {
                        filename,
                        size: file_bytes.len(),
                    }
                }
                Err(e) => {
                    error!("Download of '{}' failed: {}", filename, e);
                    let message = e.user_message();
                    busy.show(Message::error(message.clone()));
                    AttemptResult::Failed { message }
                }
            },
            Ok(ConversionOutcome::Failure { message }) => {
                busy.show(Message::error(message.clone()));
                AttemptResult::Failed { message }
            }
            Err(e) => {
                error!("Conversion request failed: {}", e);
                let message = e.user_message();
                busy.show(Message::error(message.clone()));
                AttemptResult::Failed { message }
            }
        }
    }
}

/// Holds the UI in [`Phase::Busy`]; dropping it returns to idle.
struct BusySession<'a, U: UiSurface> {
    state: &'a mut UiState,
    ui: &'a mut U,
}

impl<'a, U: UiSurface> BusySession<'a, U> {
    fn enter(state: &'a mut UiState, ui: &'a mut U) -> Self {
        state.message = Message::cleared();
        ui.show_message(&state.message);
        state.phase = Phase::Busy;
        ui.set_busy(true);
        Self { state, ui }
    }

    fn show(&mut self, message: Message) {
        self.ui.show_message(&message);
        self.state.message = message;
    }
}

impl<U: UiSurface> Drop for BusySession<'_, U> {
    fn drop(&mut self) {
        self.state.phase = Phase::Idle;
        self.ui.set_busy(false);
    }
}
