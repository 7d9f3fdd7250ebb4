pub mod client;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use client::{ChatClient, ChatTransport, ExchangeError, HealthStatus};
pub use config::Config;
pub use controller::{ChatController, ExchangeState, UiHandles, CONNECTION_FAILURE_REPLY, GENERIC_FAILURE_REPLY};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use state::{ChatMessage, ChatRole, Transcript};
pub use view::{InputField, MessageList, ScrollView, SendControl};
