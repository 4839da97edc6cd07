//! Operator-visible diagnostic output channels.

use std::fmt;
use std::sync::Arc;

/// Log target for the tracing-backed channel implementation.
const CHANNEL_TARGET: &str = "lintra_client::channel";

/// Append-only text sink surfaced to the operator by the hosting
/// editor.
///
/// Writes are best-effort: implementations must not fail or panic into
/// the calling control flow.
pub trait OutputChannel: Send + Sync {
    /// Display name identifying the sink in the editor UI.
    fn name(&self) -> &str;

    /// Appends one line of text to the sink.
    fn append_line(&self, line: &str);

    /// Makes the sink visible to the operator.
    fn reveal(&self);
}

/// Channel implementation that routes lines to `tracing` events.
///
/// Used when the hosting environment provides no native output
/// channels; the lines end up wherever the global subscriber writes.
#[derive(Debug, Clone)]
pub struct TracingChannel {
    name: String,
}

impl TracingChannel {
    /// Builds a channel with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl OutputChannel for TracingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn append_line(&self, line: &str) {
        tracing::info!(
            target: CHANNEL_TARGET,
            channel = %self.name,
            "{line}"
        );
    }

    fn reveal(&self) {
        tracing::debug!(
            target: CHANNEL_TARGET,
            channel = %self.name,
            "channel revealed"
        );
    }
}

/// The pair of sinks owned by one activation: a human-readable status
/// log and a raw protocol trace log.
///
/// Created once at activation; the sinks live for the remainder of the
/// hosting process.
#[derive(Clone)]
pub struct DiagnosticChannels {
    status: Arc<dyn OutputChannel>,
    trace: Arc<dyn OutputChannel>,
}

impl DiagnosticChannels {
    /// Display name of the status channel.
    pub const STATUS_NAME: &'static str = "Lintra";

    /// Display name of the protocol trace channel.
    pub const TRACE_NAME: &'static str = "Lintra Language Server";

    /// Builds the pair from explicit sinks.
    #[must_use]
    pub fn new(status: Arc<dyn OutputChannel>, trace: Arc<dyn OutputChannel>) -> Self {
        Self { status, trace }
    }

    /// The human-readable status sink.
    #[must_use]
    pub fn status(&self) -> &dyn OutputChannel {
        self.status.as_ref()
    }

    /// The raw protocol trace sink.
    #[must_use]
    pub fn trace(&self) -> &dyn OutputChannel {
        self.trace.as_ref()
    }

    /// Reports a failed server start.
    ///
    /// Reveals the status channel first so the operator notices without
    /// searching for it, then appends the error detail.
    pub fn report_start_failure(&self, error: &dyn fmt::Display) {
        self.status.reveal();
        self.status
            .append_line(&format!("Failed to start the Lintra language server: {error}"));
    }
}

impl fmt::Debug for DiagnosticChannels {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DiagnosticChannels")
            .field("status", &self.status.name())
            .field("trace", &self.trace.name())
            .finish()
    }
}
