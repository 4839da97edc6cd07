//! Abstractions over the external client library.
//!
//! The lifecycle controller never speaks the protocol itself; it drives
//! these traits. The production implementation spawns the real server
//! process ([`crate::ProcessClientBuilder`]), while tests inject
//! recording doubles.

use std::fmt;
use std::io;

use thiserror::Error;

use lintra_config::{DocumentSelector, LaunchVariant};

/// Errors raised while launching or stopping the external server.
#[derive(Debug, Error)]
pub enum LanguageClientError {
    /// The server binary was not found.
    #[error("language server binary not found: {command}")]
    BinaryNotFound {
        /// The command that was not found.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to spawn the server process.
    #[error("failed to spawn language server process: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The process exited before completing initialisation.
    #[error("language server exited during startup ({detail})")]
    EarlyExit {
        /// Exit detail reported by the operating system.
        detail: String,
    },

    /// The protocol handshake did not complete.
    #[error("initialisation handshake failed: {message}")]
    HandshakeFailed {
        /// Description of the handshake failure.
        message: String,
    },
}

/// A running connection to the external server.
///
/// The handle exists only between a successful launch and the session's
/// orderly stop; the controller holds at most one at a time.
pub trait ClientSession: Send {
    /// Requests orderly shutdown of the protocol session and the
    /// underlying process.
    fn stop(self: Box<Self>) -> Result<(), LanguageClientError>;
}

impl fmt::Debug for dyn ClientSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("ClientSession")
    }
}

/// Launches client sessions: the seam between the lifecycle controller
/// and the external client library.
#[cfg_attr(test, mockall::automock)]
pub trait ClientBuilder: Send + Sync {
    /// Spawns the server per `variant` and completes the handshake,
    /// registering interest in the documents described by `selector`.
    ///
    /// Blocks until the session is ready or the launch fails; the
    /// controller invokes it from a background thread.
    fn launch(
        &self,
        variant: &LaunchVariant,
        selector: &DocumentSelector,
    ) -> Result<Box<dyn ClientSession>, LanguageClientError>;
}
