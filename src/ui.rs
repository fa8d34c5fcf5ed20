//! UI state and the surface the controller drives.
//!
//! A page has four widgets the conversion flow cares about: the URL field,
//! the trigger control, a message region and a label/loading-indicator pair.
//! Instead of looking those up globally, the host passes a [`UiSurface`]
//! into the controller, which keeps the only copy of [`UiState`] and pushes
//! every change through the surface.
//!
//! # Example
//!
//! ```rust
//! use gemini_share_pdf::{Message, Tone, UiSurface};
//!
//! struct Stderr;
//!
//! impl UiSurface for Stderr {
//!     fn show_message(&mut self, message: &Message) {
//!         if !message.is_empty() {
//!             eprintln!("[{:?}] {}", message.tone, message.text);
//!         }
//!     }
//! }
//!
//! let mut ui = Stderr;
//! ui.show_message(&Message::success("Download started successfully!"));
//! assert_eq!(Message::success("x").tone, Tone::Success);
//! ```

use serde::{Deserialize, Serialize};

/// Whether an attempt is in its network phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Trigger enabled, label shown. (default)
    #[default]
    Idle,
    /// Trigger disabled, loading indicator shown.
    Busy,
}

/// Colour of the message region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Error,
}

/// Text in the message region together with its tone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Empty neutral message, shown when a network phase starts.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The only mutable state of the conversion flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiState {
    pub phase: Phase,
    pub message: Message,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }
}

/// Host-provided widgets the controller renders into.
///
/// Both methods default to no-ops so headless hosts only override what
/// they display.
pub trait UiSurface {
    /// Replace the message region's text and tone.
    fn show_message(&mut self, message: &Message) {
        let _ = message;
    }

    /// `true`: disable the trigger and show the loading indicator.
    /// `false`: re-enable the trigger and show the label again.
    fn set_busy(&mut self, busy: bool) {
        let _ = busy;
    }
}

/// A surface that renders nothing.
pub struct NoopSurface;

impl UiSurface for NoopSurface {}

impl<T: UiSurface + ?Sized> UiSurface for &mut T {
    fn show_message(&mut self, message: &Message) {
        (**self).show_message(message);
    }

    fn set_busy(&mut self, busy: bool) {
        (**self).set_busy(busy);
    }
}

impl<T: UiSurface + ?Sized> UiSurface for Box<T> {
    fn show_message(&mut self, message: &Message) {
        (**self).show_message(message);
    }

    fn set_busy(&mut self, busy: bool) {
        (**self).set_busy(busy);
    }
}
