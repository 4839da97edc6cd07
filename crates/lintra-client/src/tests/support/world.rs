//! Controller assembly shared across tests.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use lintra_config::{DocumentSelector, ServerLaunchConfig};

use crate::channels::{DiagnosticChannels, OutputChannel};
use crate::client::ClientBuilder;
use crate::controller::{ClientLifecycleController, LifecyclePhase};
use crate::extension::EditorEnvironment;

use super::{RecordingChannel, RecordingChannelHandle};

/// A controller wired to recording channels and a test builder.
pub struct ControllerWorld {
    pub controller: ClientLifecycleController,
    pub status: RecordingChannelHandle,
    pub trace: RecordingChannelHandle,
}

impl ControllerWorld {
    pub fn new(builder: impl ClientBuilder + 'static) -> Self {
        let status = RecordingChannel::new(DiagnosticChannels::STATUS_NAME);
        let trace = RecordingChannel::new(DiagnosticChannels::TRACE_NAME);
        let status_handle = status.handle();
        let trace_handle = trace.handle();

        let channels = DiagnosticChannels::new(Arc::new(status), Arc::new(trace));
        let controller = ClientLifecycleController::new(
            Box::new(builder),
            ServerLaunchConfig::bundled(),
            false,
            DocumentSelector::python_files(),
            channels,
        );

        Self {
            controller,
            status: status_handle,
            trace: trace_handle,
        }
    }
}

/// Editor environment handing out recording channels.
pub struct TestEnvironment {
    channels: Mutex<Vec<RecordingChannel>>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(Vec::new()),
        }
    }

    /// Handle for the named channel, when one has been created.
    pub fn channel(&self, name: &str) -> Option<RecordingChannelHandle> {
        let channels = self
            .channels
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        channels
            .iter()
            .find(|channel| channel.name() == name)
            .map(RecordingChannel::handle)
    }
}

impl EditorEnvironment for TestEnvironment {
    fn create_output_channel(&self, name: &str) -> Arc<dyn OutputChannel> {
        let channel = RecordingChannel::new(name);
        self.channels
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(channel.clone());
        Arc::new(channel)
    }
}

/// Polls until the controller reaches `phase` or a timeout elapses.
pub fn wait_for_phase(controller: &ClientLifecycleController, phase: LifecyclePhase) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.phase() != phase {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for phase {phase}"
        );
        thread::sleep(Duration::from_millis(5));
    }
}

/// Polls until `condition` holds or a timeout elapses.
pub fn wait_until(condition: impl Fn() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(5));
    }
}
