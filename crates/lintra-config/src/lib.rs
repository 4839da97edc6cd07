//! Pure-data configuration for the Lintra editor integration.
//!
//! The crate describes how the external language server is launched
//! ([`ServerLaunchConfig`]), which editor buffers the integration
//! applies to ([`DocumentSelector`]), and how the host's telemetry is
//! configured ([`LoggingSettings`]). None of the types carry behaviour
//! beyond accessors and matching predicates; validation of a launch
//! command happens only when the lifecycle controller attempts to
//! start the server.

mod launch;
mod logging;
mod selector;

pub use launch::{LaunchVariant, ServerLaunchConfig};
pub use logging::{LogFormat, LogFormatParseError, LoggingSettings};
pub use selector::DocumentSelector;
