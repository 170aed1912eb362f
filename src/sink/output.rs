//! Media output capability
//!
//! Everything the sink manager does to the page goes through [`MediaOutput`]:
//! creating the hidden container, creating one playable element per track,
//! routing and gain, playback and teardown. A browser host backs this with
//! DOM audio elements; tests use [`crate::testing::FakeMediaOutput`].

use crate::sink::track::MediaStream;
use std::future::Future;
use thiserror::Error;

/// Where the hidden container gets appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentNode {
    /// Element with the given id supplied by the host
    Anchor(String),
    /// Document root
    Root,
}

/// Callback fired with the element id when an element pauses on its own
pub type PauseListener = Box<dyn Fn(&str) + Send + Sync>;

/// A rejected play request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Playback requires a prior user gesture
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),
    /// The element no longer exists
    #[error("Element detached: {0}")]
    Detached(String),
    #[error("Playback failed: {0}")]
    Other(String),
}

pub trait MediaOutput {
    /// Whether an element with `anchor_id` exists to host the container
    fn has_anchor(&self, anchor_id: &str) -> bool;

    fn create_container(&self, container_id: &str, parent: &ParentNode);

    fn remove_container(&self, container_id: &str);

    /// Create a hidden playable element inside the container
    fn create_element(&self, element_id: &str, container_id: &str);

    /// Attach `stream` as the element source; `None` clears it
    fn attach_source(&self, element_id: &str, stream: Option<&MediaStream>);

    /// Gain on the 0..=100 scale
    fn set_volume(&self, element_id: &str, volume: f64);

    fn set_output_device(&self, element_id: &str, device_id: &str);

    fn add_pause_listener(&self, element_id: &str, listener: PauseListener);

    fn remove_pause_listener(&self, element_id: &str);

    /// Ask the element to start playing
    fn play(&self, element_id: &str) -> impl Future<Output = Result<(), PlaybackError>>;

    fn remove(&self, element_id: &str);
}
