//! Process-backed client sessions.
//!
//! Spawns the configured server executable and supervises the child
//! process. The protocol handshake proper belongs to the client
//! library; the readiness probe here only catches a server that dies
//! immediately after spawn, which surfaces as the handshake-failure
//! class of errors.

use std::fmt;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use lintra_config::{DocumentSelector, LaunchVariant};

use crate::client::{ClientBuilder, ClientSession, LanguageClientError};

/// Log target for process supervision.
const PROCESS_TARGET: &str = "lintra_client::process";

/// Delay before the readiness probe checks the spawned process.
const READINESS_PROBE_DELAY: Duration = Duration::from_millis(50);

/// Grace period allowed for the server to exit on its own.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Builder that launches the real server executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessClientBuilder;

impl ProcessClientBuilder {
    /// Builds a new process-backed builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ClientBuilder for ProcessClientBuilder {
    fn launch(
        &self,
        variant: &LaunchVariant,
        selector: &DocumentSelector,
    ) -> Result<Box<dyn ClientSession>, LanguageClientError> {
        debug!(
            target: PROCESS_TARGET,
            command = %variant.command.display(),
            args = ?variant.args,
            filters = selector.filters().len(),
            "spawning language server process"
        );

        let mut command = Command::new(&variant.command);
        command
            .args(&variant.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                LanguageClientError::BinaryNotFound {
                    command: variant.command.display().to_string(),
                    source: error,
                }
            } else {
                LanguageClientError::SpawnFailed {
                    message: format!("failed to start {}", variant.command.display()),
                    source: error,
                }
            }
        })?;

        thread::sleep(READINESS_PROBE_DELAY);
        match child.try_wait() {
            Ok(Some(status)) => {
                return Err(LanguageClientError::EarlyExit {
                    detail: status.to_string(),
                });
            }
            Ok(None) => {}
            Err(error) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LanguageClientError::SpawnFailed {
                    message: "failed to check process status after spawn".to_string(),
                    source: error,
                });
            }
        }

        debug!(
            target: PROCESS_TARGET,
            pid = child.id(),
            "language server process ready"
        );

        Ok(Box::new(ProcessClientSession { child: Some(child) }))
    }
}

/// A running server process owned by one session.
pub(crate) struct ProcessClientSession {
    child: Option<Child>,
}

impl ClientSession for ProcessClientSession {
    fn stop(mut self: Box<Self>) -> Result<(), LanguageClientError> {
        if let Some(mut child) = self.child.take() {
            terminate_child(&mut child);
        }
        Ok(())
    }
}

impl Drop for ProcessClientSession {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(error) = child.kill() {
                warn!(
                    target: PROCESS_TARGET,
                    error = %error,
                    "failed to kill language server process on drop"
                );
            } else {
                let _ = child.wait();
            }
        }
    }
}

impl fmt::Debug for ProcessClientSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.child {
            Some(child) => format!("running (pid: {})", child.id()),
            None => "stopped".to_string(),
        };
        formatter
            .debug_struct("ProcessClientSession")
            .field("state", &state)
            .finish()
    }
}

/// Waits for the child to exit, killing it after a short grace period.
fn terminate_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(target: PROCESS_TARGET, ?status, "language server exited");
        }
        Ok(None) => {
            warn!(
                target: PROCESS_TARGET,
                "language server still running, waiting before killing"
            );
            wait_then_kill(child);
        }
        Err(error) => {
            warn!(
                target: PROCESS_TARGET,
                error = %error,
                "failed to check process status, waiting before killing"
            );
            wait_then_kill(child);
        }
    }
}

fn wait_then_kill(child: &mut Child) {
    thread::sleep(SHUTDOWN_GRACE);
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: PROCESS_TARGET,
                ?status,
                "language server exited during grace period"
            );
        }
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
