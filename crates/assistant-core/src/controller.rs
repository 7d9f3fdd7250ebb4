//! The chat UI controller.
//!
//! Owns the transcript and the pending-request state, and drives the injected
//! UI handles. One exchange looks like:
//!
//! 1. `begin_submit` appends the user's entry, clears the input, shows the
//!    typing indicator and disables sending. The controller is now `Pending`.
//! 2. The caller awaits `ChatTransport::send_message` (the only suspension
//!    point).
//! 3. `settle` hides the indicator, appends exactly one assistant entry, and
//!    returns the controller to `Idle`.
//!
//! `submit` runs all three steps in one future. Event loops that must keep
//! processing input while a request is outstanding call the two halves
//! separately.

use std::sync::Arc;

use crate::client::{ChatTransport, ExchangeError};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::state::{ChatMessage, Transcript};
use crate::view::{InputField, MessageList, ScrollView, SendControl};

pub const GENERIC_FAILURE_REPLY: &str = "Sorry, something went wrong. Please try again.";
pub const CONNECTION_FAILURE_REPLY: &str = "Sorry, there was an error connecting to the server.";

/// The four UI elements the controller needs
pub struct UiHandles<I, S, L, V> {
    pub input: I,
    pub send: S,
    pub list: L,
    pub scroll: V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Pending,
}

pub struct ChatController<I, S, L, V> {
    handles: UiHandles<I, S, L, V>,
    transport: Arc<dyn ChatTransport>,
    sink: Arc<dyn DiagnosticSink>,
    transcript: Transcript,
    state: ExchangeState,
}

impl<I, S, L, V> ChatController<I, S, L, V>
where
    I: InputField,
    S: SendControl,
    L: MessageList,
    V: ScrollView,
{
    pub fn new(handles: UiHandles<I, S, L, V>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            handles,
            transport,
            sink: Arc::new(TracingSink),
            transcript: Transcript::new(),
            state: ExchangeState::Idle,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn handles(&self) -> &UiHandles<I, S, L, V> {
        &self.handles
    }

    pub fn handles_mut(&mut self) -> &mut UiHandles<I, S, L, V> {
        &mut self.handles
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == ExchangeState::Pending
    }

    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Show welcome lines as assistant entries. No network call is made.
    pub fn greet<Lines, T>(&mut self, lines: Lines)
    where
        Lines: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for line in lines {
            self.append(ChatMessage::assistant(line.as_ref()));
        }
    }

    /// Start an exchange from the current input.
    ///
    /// Returns the trimmed message to send, or `None` when the input is blank
    /// or an exchange is already outstanding. In both of those cases nothing
    /// is appended and the input is left untouched.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_pending() {
            tracing::debug!("submit ignored while a reply is pending");
            return None;
        }

        let text = self.handles.input.value().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.append(ChatMessage::user(text.as_str()));
        self.handles.input.clear();

        self.handles.list.show_typing();
        self.handles.send.set_enabled(false);
        self.handles.scroll.scroll_to_bottom();
        self.state = ExchangeState::Pending;

        tracing::debug!(chars = text.chars().count(), "chat exchange started");
        Some(text)
    }

    /// Finish the outstanding exchange with its outcome
    pub fn settle(&mut self, result: Result<String, ExchangeError>) {
        if !self.is_pending() {
            tracing::warn!("settlement received with no exchange outstanding");
            return;
        }

        self.handles.list.hide_typing();

        let reply = match result {
            Ok(response) => response,
            Err(ExchangeError::Status(status)) => {
                tracing::debug!(status, "chat exchange rejected");
                GENERIC_FAILURE_REPLY.to_string()
            }
            Err(err) => {
                self.sink.report(&err);
                CONNECTION_FAILURE_REPLY.to_string()
            }
        };

        self.append(ChatMessage::assistant(reply));
        self.handles.send.set_enabled(true);
        self.state = ExchangeState::Idle;
    }

    /// Run one full exchange: begin, await the transport, settle
    pub async fn submit(&mut self) {
        let Some(message) = self.begin_submit() else {
            return;
        };

        let transport = self.transport();
        let result = transport.send_message(&message).await;
        self.settle(result);
    }

    fn append(&mut self, message: ChatMessage) {
        self.handles.list.append(&message);
        self.transcript.push(message);
        self.handles.scroll.scroll_to_bottom();
    }
}
