use crate::sink::track::AudioTrack;
use std::sync::Arc;

/// Tracks whose playback is suspended and waiting for a retry trigger.
///
/// Membership is keyed by track id and kept in insertion order so retries
/// happen in the order tracks were paused.
#[derive(Debug, Default, Clone)]
pub struct AutoPausedSet {
    tracks: Vec<Arc<AudioTrack>>,
}

impl AutoPausedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the track was already queued
    pub fn add(&mut self, track: Arc<AudioTrack>) -> bool {
        if self.contains(track.track_id()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn remove(&mut self, track_id: &str) -> Option<Arc<AudioTrack>> {
        let index = self.tracks.iter().position(|t| t.track_id() == track_id)?;
        Some(self.tracks.remove(index))
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.track_id() == track_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AudioTrack>> {
        self.tracks.iter()
    }

    /// Copy of the current members, safe to iterate while the set changes
    pub fn snapshot(&self) -> Vec<Arc<AudioTrack>> {
        self.tracks.clone()
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.track_id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
