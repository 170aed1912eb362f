use crate::events::{EventRegistry, ListenerId};
use crate::sink::AudioTrack;
use std::sync::Arc;

pub const TRACK_ADDED: &str = "track-added";
pub const TRACK_REMOVED: &str = "track-removed";

/// Publishes remote audio track lifecycle events
#[derive(Debug, Default)]
pub struct NotificationManager {
    registry: EventRegistry<Arc<AudioTrack>>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&Arc<AudioTrack>) + Send + Sync + 'static,
    {
        self.registry.subscribe(event, listener)
    }

    pub fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        self.registry.unsubscribe(event, id)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.listener_count(event)
    }

    pub fn publish_track_added(&self, track: Arc<AudioTrack>) -> usize {
        log::debug!("Publishing {} for {}", TRACK_ADDED, track.track_id());
        self.registry.publish(TRACK_ADDED, &track)
    }

    pub fn publish_track_removed(&self, track: Arc<AudioTrack>) -> usize {
        log::debug!("Publishing {} for {}", TRACK_REMOVED, track.track_id());
        self.registry.publish(TRACK_REMOVED, &track)
    }
}
