//! Shared store contract used by the sink manager

use crate::sink::track::AudioTrack;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub trait TrackStore {
    /// Persist the output volume so UI state can reflect it
    fn update_audio_output_volume(&self, volume: f64);

    /// Resolve an element id (which equals the track id) back to its track
    fn get_track_by_id(&self, track_id: &str) -> Option<Arc<AudioTrack>>;
}

#[derive(Debug, Default)]
struct StoreState {
    tracks: HashMap<String, Arc<AudioTrack>>,
    audio_output_volume: Option<f64>,
}

/// Simple in-process store for hosts that keep track state locally
#[derive(Debug, Default)]
pub struct InMemoryTrackStore {
    state: RwLock<StoreState>,
}

impl InMemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&self, track: Arc<AudioTrack>) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.tracks.insert(track.track_id().to_string(), track);
    }

    pub fn remove_track(&self, track_id: &str) -> Option<Arc<AudioTrack>> {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.tracks.remove(track_id)
    }

    /// Last volume persisted by the sink, if any
    pub fn audio_output_volume(&self) -> Option<f64> {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .audio_output_volume
    }
}

impl TrackStore for InMemoryTrackStore {
    fn update_audio_output_volume(&self, volume: f64) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.audio_output_volume = Some(volume);
    }

    fn get_track_by_id(&self, track_id: &str) -> Option<Arc<AudioTrack>> {
        let state = self.state.read().unwrap_or_else(|p| p.into_inner());
        state.tracks.get(track_id).cloned()
    }
}
