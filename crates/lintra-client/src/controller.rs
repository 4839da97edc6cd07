//! Lifecycle supervision for the single client session.
//!
//! The controller owns the only mutable state of the integration: the
//! current lifecycle phase and, while one exists, the session handle.
//! Transitions run on background threads so the hosting editor's event
//! dispatch never blocks; the phase lives in a poison-recovering mutex
//! shared with those workers.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use lintra_config::{DocumentSelector, ServerLaunchConfig};

use crate::channels::DiagnosticChannels;
use crate::client::{ClientBuilder, ClientSession};

/// Log target for lifecycle transitions.
const LIFECYCLE_TARGET: &str = "lintra_client::lifecycle";

/// Observable lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// No session exists.
    Idle,
    /// A launch is in flight.
    Starting,
    /// The session handle is available.
    Running,
    /// A shutdown is in flight.
    Stopping,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        formatter.write_str(label)
    }
}

/// Errors returned by [`ClientLifecycleController`].
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// `start` was invoked while a session already exists.
    #[error("a language server session is already {phase}")]
    AlreadyActive {
        /// Phase observed when the start was rejected.
        phase: LifecyclePhase,
    },
}

/// Handle resolving once an asynchronous lifecycle operation settles.
///
/// The handle resolves when its worker finishes, success or failure
/// alike; failures themselves are reported on the diagnostic channels.
/// Dropping the handle detaches from the operation without cancelling
/// it.
#[derive(Debug)]
pub struct Completion {
    receiver: Option<Receiver<()>>,
}

impl Completion {
    /// An already-resolved completion.
    #[must_use]
    pub fn ready() -> Self {
        Self { receiver: None }
    }

    fn pending(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Whether the operation has already settled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        match &self.receiver {
            None => true,
            // Resolution is the worker dropping its guard, never a send.
            Some(receiver) => matches!(receiver.try_recv(), Err(TryRecvError::Disconnected)),
        }
    }

    /// Blocks until the operation settles.
    pub fn wait(self) {
        if let Some(receiver) = self.receiver {
            let _ = receiver.recv();
        }
    }
}

/// Sender half held by a worker; dropping it resolves the completion.
type CompletionGuard = Sender<()>;

fn completion_pair() -> (CompletionGuard, Completion) {
    let (sender, receiver) = mpsc::channel();
    (sender, Completion::pending(receiver))
}

/// Internal phase of the supervised session.
enum Phase {
    /// No session exists.
    Idle,
    /// A launch is in flight. `stop_waiter` is present when a stop
    /// arrived during the launch; the start worker finalises that stop.
    Starting { stop_waiter: Option<CompletionGuard> },
    /// The session is up.
    Running { session: Box<dyn ClientSession> },
    /// A shutdown worker is tearing the session down.
    Stopping,
}

impl Phase {
    fn observable(&self) -> LifecyclePhase {
        match self {
            Self::Idle => LifecyclePhase::Idle,
            Self::Starting { stop_waiter: None } => LifecyclePhase::Starting,
            Self::Starting { stop_waiter: Some(_) } | Self::Stopping => LifecyclePhase::Stopping,
            Self::Running { .. } => LifecyclePhase::Running,
        }
    }
}

struct Shared {
    builder: Box<dyn ClientBuilder>,
    config: ServerLaunchConfig,
    development: bool,
    selector: DocumentSelector,
    channels: DiagnosticChannels,
    phase: Mutex<Phase>,
}

/// Supervises the single language client session of one activation.
///
/// At most one session may be starting or running at any time; a second
/// `start` is rejected rather than creating a second session.
pub struct ClientLifecycleController {
    shared: Arc<Shared>,
}

impl ClientLifecycleController {
    /// Builds a controller from its collaborators.
    #[must_use]
    pub fn new(
        builder: Box<dyn ClientBuilder>,
        config: ServerLaunchConfig,
        development: bool,
        selector: DocumentSelector,
        channels: DiagnosticChannels,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                builder,
                config,
                development,
                selector,
                channels,
                phase: Mutex::new(Phase::Idle),
            }),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        lock_phase(&self.shared.phase).observable()
    }

    /// The diagnostic channels this controller reports through.
    #[must_use]
    pub fn channels(&self) -> &DiagnosticChannels {
        &self.shared.channels
    }

    /// Begins starting the session, returning immediately.
    ///
    /// Valid only from idle; any other phase yields
    /// [`LifecycleError::AlreadyActive`]. The launch runs on a
    /// background thread. Failures are reported on the status channel,
    /// not through the returned [`Completion`], which merely resolves
    /// once the attempt has settled either way.
    pub fn start(&self) -> Result<Completion, LifecycleError> {
        {
            let mut phase = lock_phase(&self.shared.phase);
            match &*phase {
                Phase::Idle => {}
                other => {
                    return Err(LifecycleError::AlreadyActive {
                        phase: other.observable(),
                    });
                }
            }
            *phase = Phase::Starting { stop_waiter: None };
        }

        let (guard, completion) = completion_pair();
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            run_start(&shared);
            drop(guard);
        });
        Ok(completion)
    }

    /// Requests an orderly stop of the session.
    ///
    /// Returns a completion that resolves once the session is gone.
    /// From idle (or while a previous stop is still in flight) this is
    /// a no-op: no channel output, no state change, already-resolved
    /// completion. A stop issued while a launch is in flight cancels
    /// it; the launched session, if any, is stopped as soon as the
    /// launch settles.
    pub fn stop(&self) -> Completion {
        let mut phase = lock_phase(&self.shared.phase);
        match std::mem::replace(&mut *phase, Phase::Idle) {
            Phase::Idle => Completion::ready(),
            Phase::Stopping => {
                *phase = Phase::Stopping;
                Completion::ready()
            }
            Phase::Starting { stop_waiter: Some(waiter) } => {
                *phase = Phase::Starting {
                    stop_waiter: Some(waiter),
                };
                Completion::ready()
            }
            Phase::Starting { stop_waiter: None } => {
                let (guard, completion) = completion_pair();
                *phase = Phase::Starting {
                    stop_waiter: Some(guard),
                };
                debug!(
                    target: LIFECYCLE_TARGET,
                    "stop requested while starting, cancelling launch"
                );
                completion
            }
            Phase::Running { session } => {
                *phase = Phase::Stopping;
                drop(phase);

                let (guard, completion) = completion_pair();
                let shared = Arc::clone(&self.shared);
                thread::spawn(move || {
                    stop_session(session);
                    *lock_phase(&shared.phase) = Phase::Idle;
                    debug!(target: LIFECYCLE_TARGET, "language server session stopped");
                    drop(guard);
                });
                completion
            }
        }
    }
}

impl fmt::Debug for ClientLifecycleController {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClientLifecycleController")
            .field("phase", &self.phase())
            .field("channels", &self.shared.channels)
            .finish()
    }
}

/// Runs the launch on the start worker and publishes the outcome.
fn run_start(shared: &Shared) {
    let variant = shared.config.variant(shared.development);
    debug!(
        target: LIFECYCLE_TARGET,
        command = %variant.command.display(),
        "starting language server session"
    );

    let outcome = shared.builder.launch(variant, &shared.selector);

    let mut phase = lock_phase(&shared.phase);
    match (std::mem::replace(&mut *phase, Phase::Idle), outcome) {
        (Phase::Starting { stop_waiter: None }, Ok(session)) => {
            *phase = Phase::Running { session };
            debug!(target: LIFECYCLE_TARGET, "language server session running");
        }
        (Phase::Starting { stop_waiter: Some(waiter) }, Ok(session)) => {
            // A stop arrived while the launch was in flight; tear the
            // fresh session straight down again. Observers keep seeing
            // the teardown until it finishes, as on the running path.
            *phase = Phase::Stopping;
            drop(phase);
            stop_session(session);
            *lock_phase(&shared.phase) = Phase::Idle;
            debug!(
                target: LIFECYCLE_TARGET,
                "cancelled launch settled, session stopped"
            );
            drop(waiter);
        }
        (Phase::Starting { stop_waiter }, Err(error)) => {
            drop(phase);
            warn!(
                target: LIFECYCLE_TARGET,
                error = %error,
                "language server failed to start"
            );
            shared.channels.report_start_failure(&error);
            drop(stop_waiter);
        }
        (other, outcome) => {
            // The phase changed under the launch; restore it and
            // discard any session the stale launch produced.
            *phase = other;
            drop(phase);
            if let Ok(session) = outcome {
                stop_session(session);
            }
        }
    }
}

fn stop_session(session: Box<dyn ClientSession>) {
    if let Err(error) = session.stop() {
        debug!(
            target: LIFECYCLE_TARGET,
            error = %error,
            "session stop reported an error"
        );
    }
}

fn lock_phase(phase: &Mutex<Phase>) -> MutexGuard<'_, Phase> {
    // Recover from poisoning so shutdown still works after a panic.
    phase.lock().unwrap_or_else(|poison| poison.into_inner())
}
