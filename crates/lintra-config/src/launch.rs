//! Launch descriptions for the external language server process.

use std::path::PathBuf;

/// One concrete command line used to start the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchVariant {
    /// The executable path or command name.
    pub command: PathBuf,
    /// Arguments passed to the server executable.
    pub args: Vec<String>,
}

impl LaunchVariant {
    /// Builds a variant from a command and its arguments.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

/// Describes how to start the external language server.
///
/// The configuration is pure data: nothing is validated at construction
/// time, and an unusable command surfaces only when the lifecycle
/// controller attempts to spawn the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunchConfig {
    release: LaunchVariant,
    debug: Option<LaunchVariant>,
}

impl ServerLaunchConfig {
    /// Builds a configuration with only a release variant.
    #[must_use]
    pub fn new(release: LaunchVariant) -> Self {
        Self {
            release,
            debug: None,
        }
    }

    /// Launch description for the bundled server (`lintra server`).
    ///
    /// Expects `lintra` to be available in `PATH`; the `server`
    /// subcommand switches the linter executable into LSP mode.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(LaunchVariant::new("lintra", vec!["server".to_string()]))
    }

    /// Sets an alternate variant used under a development build.
    #[must_use]
    pub fn with_debug(mut self, debug: LaunchVariant) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Selects the variant for the requested build mode.
    ///
    /// Falls back to the release variant when no debug variant is
    /// configured.
    #[must_use]
    pub fn variant(&self, development: bool) -> &LaunchVariant {
        if development {
            self.debug.as_ref().unwrap_or(&self.release)
        } else {
            &self.release
        }
    }

    /// The release variant.
    #[must_use]
    pub fn release(&self) -> &LaunchVariant {
        &self.release
    }

    /// The debug variant, when one is configured.
    #[must_use]
    pub fn debug(&self) -> Option<&LaunchVariant> {
        self.debug.as_ref()
    }
}
