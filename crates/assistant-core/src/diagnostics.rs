use crate::client::ExchangeError;

/// Receives transport and parse failures for operator visibility.
/// Reports never affect the transcript or control flow.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &ExchangeError);
}

/// Forwards every report to the `tracing` subscriber as one error event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, error: &ExchangeError) {
        tracing::error!(error = %error, "chat exchange failed");
    }
}
