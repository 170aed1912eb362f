//! Audio sink: one hidden playable element per remote audio track
//!
//! Submodules:
//! - `manager`: lifecycle, volume and autoplay recovery
//! - `output`: media output capability the manager drives
//! - `track`: remote audio track handle
//! - `store`: shared store contract
//! - `paused`: auto-paused track set

pub mod manager;
pub mod output;
pub mod paused;
pub mod store;
pub mod track;

pub use manager::{AudioSinkManager, AutoplayEvent, SinkEvent, AUTOPLAY_ERROR, DEFAULT_VOLUME};
pub use output::{MediaOutput, ParentNode, PauseListener, PlaybackError};
pub use paused::AutoPausedSet;
pub use store::{InMemoryTrackStore, TrackStore};
pub use track::{AudioTrack, MediaStream};
