//! Editor-side bootstrap for the Lintra language server.
//!
//! The crate owns the activation lifecycle of the external server
//! process: it builds the operator-visible diagnostic channels, starts
//! the server per the configured launch description, and tears the
//! session down again when the hosting editor deactivates the
//! integration. Protocol details stay behind the [`ClientBuilder`]
//! trait so tests and higher layers can inject lightweight
//! implementations without spawning real server processes.

mod channels;
mod client;
mod controller;
mod extension;
mod process;
pub mod telemetry;

pub use channels::{DiagnosticChannels, OutputChannel, TracingChannel};
pub use client::{ClientBuilder, ClientSession, LanguageClientError};
pub use controller::{ClientLifecycleController, Completion, LifecycleError, LifecyclePhase};
pub use extension::{EditorEnvironment, Extension, activate, deactivate};
pub use process::ProcessClientBuilder;
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
