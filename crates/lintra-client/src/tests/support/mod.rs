//! Shared test doubles and assembly helpers.

mod recording;
mod world;

pub use recording::{
    ChannelEvent, RecordingBuilder, RecordingBuilderHandle, RecordingChannel,
    RecordingChannelHandle, StubSession,
};
pub use world::{ControllerWorld, TestEnvironment, wait_for_phase, wait_until};
