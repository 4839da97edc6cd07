//! Editor-facing entry points.
//!
//! The hosting editor supplies an [`EditorEnvironment`], builds one
//! [`Extension`] per activation context, and invokes [`activate`] and
//! [`deactivate`] as its own lifecycle demands.

use std::sync::Arc;

use tracing::warn;

use lintra_config::{DocumentSelector, ServerLaunchConfig};

use crate::channels::{DiagnosticChannels, OutputChannel};
use crate::client::ClientBuilder;
use crate::controller::{ClientLifecycleController, Completion};
use crate::process::ProcessClientBuilder;

/// Log target for the entry points.
const EXTENSION_TARGET: &str = "lintra_client::extension";

/// Context supplied by the hosting editor.
pub trait EditorEnvironment: Send + Sync {
    /// Creates a named operator-visible output channel.
    fn create_output_channel(&self, name: &str) -> Arc<dyn OutputChannel>;

    /// Whether the extension runs as a development build, selecting the
    /// debug launch variant when one is configured.
    fn development_mode(&self) -> bool {
        false
    }
}

/// One activation of the editor integration.
///
/// Owns the lifecycle controller and, through it, the diagnostic
/// channels. Built once per hosting context and passed explicitly to
/// both entry points; there is no module-level session state.
pub struct Extension {
    controller: ClientLifecycleController,
}

impl Extension {
    /// Builds the extension's collaborators from the hosting context:
    /// channels first, then launch configuration and document selector,
    /// then the controller composing them.
    #[must_use]
    pub fn new(environment: &dyn EditorEnvironment) -> Self {
        Self::with_builder(environment, Box::new(ProcessClientBuilder::new()))
    }

    /// Builds the extension with a custom client builder.
    #[must_use]
    pub fn with_builder(
        environment: &dyn EditorEnvironment,
        builder: Box<dyn ClientBuilder>,
    ) -> Self {
        let channels = DiagnosticChannels::new(
            environment.create_output_channel(DiagnosticChannels::STATUS_NAME),
            environment.create_output_channel(DiagnosticChannels::TRACE_NAME),
        );
        let controller = ClientLifecycleController::new(
            builder,
            ServerLaunchConfig::bundled(),
            environment.development_mode(),
            DocumentSelector::python_files(),
            channels,
        );
        Self { controller }
    }

    /// The lifecycle controller, exposed for observers.
    #[must_use]
    pub fn controller(&self) -> &ClientLifecycleController {
        &self.controller
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Extension")
            .field("controller", &self.controller)
            .finish()
    }
}

/// Brings the session up; returns before the start completes.
///
/// Start failures surface on the status channel, never through this
/// entry point. A rejected start (a session already exists) is logged
/// and otherwise ignored.
pub fn activate(extension: &Extension) {
    match extension.controller.start() {
        Ok(completion) => drop(completion),
        Err(error) => {
            warn!(
                target: EXTENSION_TARGET,
                error = %error,
                "activation rejected"
            );
        }
    }
}

/// Tears the session down.
///
/// Returns a completion the host can wait on before finalising its own
/// shutdown; already resolved when no session exists.
#[must_use]
pub fn deactivate(extension: &Extension) -> Completion {
    extension.controller.stop()
}
