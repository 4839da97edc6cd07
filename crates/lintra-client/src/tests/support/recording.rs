//! Recording test doubles for channels and client sessions.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use lintra_config::{DocumentSelector, LaunchVariant};

use crate::channels::OutputChannel;
use crate::client::{ClientBuilder, ClientSession, LanguageClientError};

/// Events observed by a recording channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The channel was made visible.
    Revealed,
    /// One line was appended.
    Appended(String),
}

/// Output channel that records every interaction.
#[derive(Clone)]
pub struct RecordingChannel {
    name: String,
    shared: Arc<Mutex<Vec<ChannelEvent>>>,
}

impl RecordingChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a handle that can be used to assert recorded events.
    pub fn handle(&self) -> RecordingChannelHandle {
        RecordingChannelHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl OutputChannel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn append_line(&self, line: &str) {
        lock(&self.shared).push(ChannelEvent::Appended(line.to_string()));
    }

    fn reveal(&self) {
        lock(&self.shared).push(ChannelEvent::Revealed);
    }
}

/// Handle exposing a recording channel's observed events.
#[derive(Clone)]
pub struct RecordingChannelHandle {
    shared: Arc<Mutex<Vec<ChannelEvent>>>,
}

impl RecordingChannelHandle {
    /// The ordered list of events the channel observed.
    pub fn events(&self) -> Vec<ChannelEvent> {
        lock(&self.shared).clone()
    }
}

#[derive(Debug, Clone)]
enum LaunchScript {
    Succeed,
    Fail(String),
}

struct BuilderState {
    script: LaunchScript,
    launches: usize,
    stop_requests: usize,
    stops: usize,
    commands: Vec<String>,
    gate: Option<Receiver<()>>,
    stop_gate: Option<Receiver<()>>,
}

/// Client builder double with scripted launch outcomes.
#[derive(Clone)]
pub struct RecordingBuilder {
    shared: Arc<Mutex<BuilderState>>,
}

impl RecordingBuilder {
    fn with_script(script: LaunchScript, gate: Option<Receiver<()>>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(BuilderState {
                script,
                launches: 0,
                stop_requests: 0,
                stops: 0,
                commands: Vec::new(),
                gate,
                stop_gate: None,
            })),
        }
    }

    /// Builder whose launches succeed immediately.
    pub fn succeeding() -> Self {
        Self::with_script(LaunchScript::Succeed, None)
    }

    /// Builder whose launches fail with a handshake error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(LaunchScript::Fail(message.into()), None)
    }

    /// Builder whose first launch blocks until the returned sender is
    /// signalled or dropped.
    pub fn gated() -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self::with_script(LaunchScript::Succeed, Some(receiver)),
            sender,
        )
    }

    /// Builder whose first launch blocks until the returned sender is
    /// signalled or dropped, then fails with a handshake error.
    pub fn gated_failing(message: impl Into<String>) -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self::with_script(LaunchScript::Fail(message.into()), Some(receiver)),
            sender,
        )
    }

    /// Makes the next session stop block until the returned sender is
    /// signalled or dropped.
    pub fn blocking_stop(self) -> (Self, Sender<()>) {
        let (sender, receiver) = mpsc::channel();
        lock(&self.shared).stop_gate = Some(receiver);
        (self, sender)
    }

    /// Returns a handle that can be used to assert recorded activity.
    pub fn handle(&self) -> RecordingBuilderHandle {
        RecordingBuilderHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl ClientBuilder for RecordingBuilder {
    fn launch(
        &self,
        variant: &LaunchVariant,
        _selector: &DocumentSelector,
    ) -> Result<Box<dyn ClientSession>, LanguageClientError> {
        let (script, gate) = {
            let mut state = lock(&self.shared);
            state.launches += 1;
            state.commands.push(variant.command.display().to_string());
            (state.script.clone(), state.gate.take())
        };

        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        match script {
            LaunchScript::Succeed => Ok(Box::new(RecordingSession {
                shared: Arc::clone(&self.shared),
            })),
            LaunchScript::Fail(message) => Err(LanguageClientError::HandshakeFailed { message }),
        }
    }
}

/// Handle exposing a recording builder's observed activity.
#[derive(Clone)]
pub struct RecordingBuilderHandle {
    shared: Arc<Mutex<BuilderState>>,
}

impl RecordingBuilderHandle {
    /// Number of launches the builder observed.
    pub fn launches(&self) -> usize {
        lock(&self.shared).launches
    }

    /// Number of session stops that have begun, counting any still
    /// blocked on a stop gate.
    pub fn stop_requests(&self) -> usize {
        lock(&self.shared).stop_requests
    }

    /// Number of session stops observed across all launches.
    pub fn stops(&self) -> usize {
        lock(&self.shared).stops
    }

    /// Commands passed to the builder, in launch order.
    pub fn commands(&self) -> Vec<String> {
        lock(&self.shared).commands.clone()
    }
}

struct RecordingSession {
    shared: Arc<Mutex<BuilderState>>,
}

impl ClientSession for RecordingSession {
    fn stop(self: Box<Self>) -> Result<(), LanguageClientError> {
        let gate = {
            let mut state = lock(&self.shared);
            state.stop_requests += 1;
            state.stop_gate.take()
        };

        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        lock(&self.shared).stops += 1;
        Ok(())
    }
}

/// Session double whose stop always succeeds without recording.
pub struct StubSession;

impl ClientSession for StubSession {
    fn stop(self: Box<Self>) -> Result<(), LanguageClientError> {
        Ok(())
    }
}

fn lock<T>(shared: &Arc<Mutex<T>>) -> std::sync::MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(|poison| poison.into_inner())
}
