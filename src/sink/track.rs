use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Handle to the native stream wrapping a remote audio track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStream {
    pub id: String,
    pub native_track_id: String,
}

impl MediaStream {
    pub fn for_track(native_track_id: impl Into<String>) -> Self {
        let native_track_id = native_track_id.into();
        Self {
            id: format!("stream-{}", uuid::Uuid::new_v4()),
            native_track_id,
        }
    }
}

/// A remote audio track owned by the SDK.
///
/// `enabled` mirrors the native track flag and can flip at any time (mute
/// from the remote side), so it is atomic rather than behind the sink's state.
#[derive(Debug)]
pub struct AudioTrack {
    track_id: String,
    enabled: AtomicBool,
    stream: MediaStream,
    audio_element: RwLock<Option<String>>,
}

impl AudioTrack {
    pub fn new(track_id: impl Into<String>) -> Self {
        let track_id = track_id.into();
        let stream = MediaStream::for_track(track_id.clone());
        Self {
            track_id,
            enabled: AtomicBool::new(true),
            stream,
            audio_element: RwLock::new(None),
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn stream(&self) -> &MediaStream {
        &self.stream
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Id of the playable element currently bound to this track
    pub fn audio_element(&self) -> Option<String> {
        self.audio_element
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_audio_element(&self, element_id: Option<String>) {
        *self
            .audio_element
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = element_id;
    }
}
