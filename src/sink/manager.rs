//! Audio sink lifecycle and autoplay recovery
//!
//! The manager owns one hidden container and one playable element per remote
//! audio track. When the platform rejects a play request (autoplay policy) the
//! track is parked in the auto-paused set and an `autoplay-error` event is
//! published. Parked tracks are retried when the host calls
//! [`AudioSinkManager::unblock_autoplay`] after a user gesture, or when the
//! output device changes.
//!
//! Collaborator callbacks are synchronous, so they only enqueue a
//! [`SinkEvent`]. Queued events are handled in arrival order by
//! [`AudioSinkManager::dispatch_pending`] or [`AudioSinkManager::run`].
//! Everything runs on one task; futures returned by the media output are not
//! required to be `Send`, so drive `run` with `tokio::task::LocalSet` or await
//! it directly.

use crate::config::SinkConfig;
use crate::errors::{RoomkitError, SdkException};
use crate::events::{EventRegistry, ListenerId};
use crate::platform::PlatformCapabilities;
use crate::sdk::{
    DeviceChangeEvent, DeviceManager, NotificationManager, AUDIO_DEVICE_CHANGE, TRACK_ADDED,
    TRACK_REMOVED,
};
use crate::sink::output::{MediaOutput, ParentNode};
use crate::sink::paused::AutoPausedSet;
use crate::sink::store::TrackStore;
use crate::sink::track::AudioTrack;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify, RwLock};

pub const AUTOPLAY_ERROR: &str = "autoplay-error";

pub const DEFAULT_VOLUME: f64 = 100.0;

/// Payload of `autoplay-error`
#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayEvent {
    pub error: SdkException,
}

/// Work queued by collaborator callbacks and element listeners
#[derive(Debug, Clone)]
pub enum SinkEvent {
    TrackAdded(Arc<AudioTrack>),
    TrackRemoved(Arc<AudioTrack>),
    AudioDeviceChange(DeviceChangeEvent),
    ElementPaused(String),
}

struct Subscriptions {
    track_added: ListenerId,
    track_removed: ListenerId,
    device_change: ListenerId,
}

/// A track bound to an element. `token` is unique for the lifetime of the
/// manager, so a re-added track with the same id gets a fresh one.
struct Binding {
    track: Arc<AudioTrack>,
    token: u64,
}

/// Queued work tagged with the session generation it was produced in
type Queued = (u64, SinkEvent);

struct SinkState {
    initialized: bool,
    container_id: Option<String>,
    /// element id (equal to the track id) -> binding
    bindings: HashMap<String, Binding>,
    next_token: u64,
    auto_paused: AutoPausedSet,
    autoplay_failed: bool,
    volume: f64,
    /// Bumped on every clean up so events queued by an earlier session are dropped
    generation: u64,
    subscriptions: Option<Subscriptions>,
}

pub struct AudioSinkManager<M: MediaOutput, S: TrackStore> {
    output: Arc<M>,
    store: Arc<S>,
    notifications: Arc<NotificationManager>,
    devices: Arc<DeviceManager>,
    capabilities: PlatformCapabilities,
    default_anchor: Option<String>,
    retry_on_device_change: bool,
    state: RwLock<SinkState>,
    listeners: EventRegistry<AutoplayEvent>,
    event_tx: mpsc::UnboundedSender<Queued>,
    event_rx: Mutex<mpsc::UnboundedReceiver<Queued>>,
    shutdown: Notify,
}

impl<M: MediaOutput, S: TrackStore> AudioSinkManager<M, S> {
    pub fn new(
        store: Arc<S>,
        notifications: Arc<NotificationManager>,
        devices: Arc<DeviceManager>,
        output: Arc<M>,
        capabilities: PlatformCapabilities,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            output,
            store,
            notifications,
            devices,
            capabilities,
            default_anchor: None,
            retry_on_device_change: true,
            state: RwLock::new(SinkState {
                initialized: false,
                container_id: None,
                bindings: HashMap::new(),
                next_token: 0,
                auto_paused: AutoPausedSet::new(),
                autoplay_failed: false,
                volume: DEFAULT_VOLUME,
                generation: 0,
                subscriptions: None,
            }),
            listeners: EventRegistry::new(),
            event_tx,
            event_rx: Mutex::new(event_rx),
            shutdown: Notify::new(),
        }
    }

    /// Build a manager with volume, anchor and retry policy taken from config
    pub fn from_config(
        store: Arc<S>,
        notifications: Arc<NotificationManager>,
        devices: Arc<DeviceManager>,
        output: Arc<M>,
        capabilities: PlatformCapabilities,
        config: &SinkConfig,
    ) -> Self {
        let mut manager = Self::new(store, notifications, devices, output, capabilities);
        manager.default_anchor = config.container_anchor.clone();
        manager.retry_on_device_change = config.retry_on_device_change;
        manager.state.get_mut().volume = config.default_volume;
        manager
    }

    /// Create the hidden container and start listening for track and device
    /// events. Only the first call has an effect until [`Self::clean_up`].
    pub async fn init(&self, anchor_id: Option<&str>) {
        let mut state = self.state.write().await;
        if state.initialized {
            return;
        }
        state.initialized = true;

        let container_id = format!("audio-sink-{}", uuid::Uuid::new_v4());
        let anchor = anchor_id
            .map(str::to_string)
            .or_else(|| self.default_anchor.clone());
        let parent = match anchor {
            Some(id) if self.output.has_anchor(&id) => ParentNode::Anchor(id),
            Some(id) => {
                log::debug!("Anchor {} not found, attaching audio sink to root", id);
                ParentNode::Root
            }
            None => ParentNode::Root,
        };
        self.output.create_container(&container_id, &parent);
        log::info!("Audio sink {} initialized under {:?}", container_id, parent);

        state.container_id = Some(container_id);
        state.subscriptions = Some(self.subscribe(state.generation));
    }

    fn subscribe(&self, generation: u64) -> Subscriptions {
        let tx = self.event_tx.clone();
        let track_added = self.notifications.add_event_listener(TRACK_ADDED, move |track| {
            let _ = tx.send((generation, SinkEvent::TrackAdded(Arc::clone(track))));
        });
        let tx = self.event_tx.clone();
        let track_removed = self.notifications.add_event_listener(TRACK_REMOVED, move |track| {
            let _ = tx.send((generation, SinkEvent::TrackRemoved(Arc::clone(track))));
        });
        let tx = self.event_tx.clone();
        let device_change = self.devices.add_event_listener(AUDIO_DEVICE_CHANGE, move |event| {
            let _ = tx.send((generation, SinkEvent::AudioDeviceChange(event.clone())));
        });
        Subscriptions {
            track_added,
            track_removed,
            device_change,
        }
    }

    /// Stop listening, remove every element and the container, and forget
    /// autoplay state. Safe to call repeatedly or before `init`.
    pub async fn clean_up(&self) {
        let mut state = self.state.write().await;
        if let Some(subs) = state.subscriptions.take() {
            self.notifications.remove_event_listener(TRACK_ADDED, subs.track_added);
            self.notifications.remove_event_listener(TRACK_REMOVED, subs.track_removed);
            self.devices.remove_event_listener(AUDIO_DEVICE_CHANGE, subs.device_change);
        }
        for (element_id, binding) in state.bindings.drain() {
            self.detach_element(&element_id, &binding.track);
        }
        if let Some(container_id) = state.container_id.take() {
            self.output.remove_container(&container_id);
            log::info!("Audio sink {} removed", container_id);
        }
        state.auto_paused.clear();
        state.initialized = false;
        state.autoplay_failed = false;
        state.generation += 1;
        drop(state);
        // A running event loop holds the receiver; its leftovers fail the
        // generation check instead
        if let Ok(mut rx) = self.event_rx.try_lock() {
            while rx.try_recv().is_ok() {}
        }
        self.shutdown.notify_waiters();
    }

    fn detach_element(&self, element_id: &str, track: &AudioTrack) {
        self.output.remove_pause_listener(element_id);
        self.output.attach_source(element_id, None);
        self.output.remove(element_id);
        track.set_audio_element(None);
    }

    pub async fn get_volume(&self) -> f64 {
        self.state.read().await.volume
    }

    /// Persist `value` and apply it to every bound element
    pub async fn set_volume(&self, value: f64) -> Result<(), RoomkitError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(RoomkitError::InvalidVolume(format!(
                "{} is outside 0..=100",
                value
            )));
        }
        self.store.update_audio_output_volume(value);
        let mut state = self.state.write().await;
        state.volume = value;
        for element_id in state.bindings.keys() {
            self.output.set_volume(element_id, value);
        }
        Ok(())
    }

    /// Retry every auto-paused track. Call only from a user gesture handler
    /// after an `autoplay-error`; does nothing unless autoplay has failed.
    pub async fn unblock_autoplay(&self) {
        if !self.state.read().await.autoplay_failed {
            return;
        }
        self.unpause_audio_tracks().await;
    }

    pub fn add_event_listener<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&AutoplayEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(event, listener)
    }

    pub fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        self.listeners.unsubscribe(event, id)
    }

    /// Handle every queued event, including ones queued while handling.
    /// Returns how many were handled.
    pub async fn dispatch_pending(&self) -> usize {
        let mut handled = 0;
        loop {
            let next = self.event_rx.lock().await.try_recv().ok();
            let Some((generation, event)) = next else {
                break;
            };
            if self.is_current(generation).await {
                self.handle_event(event).await;
                handled += 1;
            }
        }
        handled
    }

    /// Handle events as they arrive until [`Self::clean_up`] is called
    pub async fn run(&self) {
        let mut rx = self.event_rx.lock().await;
        loop {
            let shutdown = self.shutdown.notified();
            tokio::pin!(shutdown);
            shutdown.as_mut().enable();
            if !self.is_initialized().await {
                break;
            }
            tokio::select! {
                _ = &mut shutdown => break,
                event = rx.recv() => match event {
                    Some((generation, event)) => {
                        if self.is_current(generation).await {
                            self.handle_event(event).await;
                        }
                    }
                    None => break,
                },
            }
        }
        log::debug!("Audio sink event loop stopped");
    }

    async fn is_current(&self, generation: u64) -> bool {
        let current = self.state.read().await.generation;
        if current != generation {
            log::debug!("Dropping event queued before clean up");
        }
        current == generation
    }

    pub async fn handle_event(&self, event: SinkEvent) {
        match event {
            SinkEvent::TrackAdded(track) => self.handle_track_added(track).await,
            SinkEvent::TrackRemoved(track) => self.handle_track_removed(&track).await,
            SinkEvent::AudioDeviceChange(change) => self.handle_audio_device_change(&change).await,
            SinkEvent::ElementPaused(element_id) => self.handle_element_paused(&element_id).await,
        }
    }

    /// Bind a playable element to `track` and try to play it, unless autoplay
    /// already failed, in which case the track is parked without an attempt.
    pub async fn handle_track_added(&self, track: Arc<AudioTrack>) {
        let mut state = self.state.write().await;
        let Some(container_id) = state.container_id.clone() else {
            log::warn!("Audio sink not initialized, ignoring track {}", track.track_id());
            return;
        };
        let element_id = track.track_id().to_string();
        if state.bindings.contains_key(&element_id) {
            log::debug!("Audio track {} already bound", element_id);
            return;
        }

        self.output.create_element(&element_id, &container_id);
        self.output.attach_source(&element_id, Some(track.stream()));
        let tx = self.event_tx.clone();
        let generation = state.generation;
        self.output.add_pause_listener(
            &element_id,
            Box::new(move |id| {
                let _ = tx.send((generation, SinkEvent::ElementPaused(id.to_string())));
            }),
        );
        track.set_audio_element(Some(element_id.clone()));
        log::debug!("Audio track added {}", element_id);

        if let Some(device_id) = self.devices.output_device() {
            if self.capabilities.output_selection_supported {
                self.output.set_output_device(&element_id, &device_id);
            } else {
                log::debug!("Output device selection unsupported, keeping default for {}", element_id);
            }
        }
        self.output.set_volume(&element_id, state.volume);
        let token = state.next_token;
        state.next_token += 1;
        state.bindings.insert(
            element_id,
            Binding {
                track: Arc::clone(&track),
                token,
            },
        );

        if state.autoplay_failed {
            state.auto_paused.add(track);
            return;
        }
        drop(state);
        self.attempt_playback(track).await;
    }

    pub async fn handle_track_removed(&self, track: &AudioTrack) {
        let mut state = self.state.write().await;
        state.auto_paused.remove(track.track_id());
        if let Some(bound) = state.bindings.remove(track.track_id()) {
            self.detach_element(track.track_id(), &bound.track);
        }
        log::debug!("Audio track removed {}", track.track_id());
    }

    pub async fn handle_audio_device_change(&self, event: &DeviceChangeEvent) {
        if event.error.is_some() || event.init {
            return;
        }
        if !self.retry_on_device_change {
            return;
        }
        self.unpause_audio_tracks().await;
    }

    /// An element paused without our involvement (e.g. headset unplugged).
    /// If its track is still enabled, park it for the next retry trigger.
    pub async fn handle_element_paused(&self, element_id: &str) {
        let mut state = self.state.write().await;
        let enabled = state
            .bindings
            .get(element_id)
            .is_some_and(|binding| binding.track.is_enabled());
        if !enabled {
            return;
        }
        log::debug!("Audio paused {}", element_id);
        if let Some(track) = self.store.get_track_by_id(element_id) {
            state.auto_paused.add(track);
        }
    }

    async fn unpause_audio_tracks(&self) {
        let tracks = self.state.read().await.auto_paused.snapshot();
        if tracks.is_empty() {
            return;
        }
        let attempts = tracks
            .into_iter()
            .map(|track| self.attempt_playback(track));
        futures::future::join_all(attempts).await;
    }

    /// One play request. Returns whether the track is now playing.
    async fn attempt_playback(&self, track: Arc<AudioTrack>) -> bool {
        let Some(element_id) = track.audio_element() else {
            log::warn!("No audio element found on track {}", track.track_id());
            return false;
        };
        let token = self
            .state
            .read()
            .await
            .bindings
            .get(track.track_id())
            .map(|binding| binding.token);
        let Some(token) = token else {
            log::debug!("Track {} is not bound, skipping playback", track.track_id());
            return false;
        };

        let result = self.output.play(&element_id).await;

        // The binding may have been torn down, or replaced by a re-added
        // track with the same id, while the request was in flight
        let mut state = self.state.write().await;
        let still_bound = state
            .bindings
            .get(track.track_id())
            .is_some_and(|binding| binding.token == token);
        if !still_bound {
            log::debug!("Discarding stale playback result for {}", track.track_id());
            return false;
        }
        match result {
            Ok(()) => {
                state.autoplay_failed = false;
                state.auto_paused.remove(track.track_id());
                log::debug!("Played track {}", track.track_id());
                true
            }
            Err(e) => {
                state.autoplay_failed = true;
                state.auto_paused.add(Arc::clone(&track));
                drop(state);
                log::error!("Failed to play track {}: {}", track.track_id(), e);
                let event = AutoplayEvent {
                    error: SdkException::autoplay_blocked(""),
                };
                self.listeners.publish(AUTOPLAY_ERROR, &event);
                false
            }
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    pub async fn autoplay_failed(&self) -> bool {
        self.state.read().await.autoplay_failed
    }

    pub async fn container_id(&self) -> Option<String> {
        self.state.read().await.container_id.clone()
    }

    pub async fn auto_paused_track_ids(&self) -> Vec<String> {
        self.state.read().await.auto_paused.track_ids()
    }

    pub async fn bound_track_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.read().await.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::store::InMemoryTrackStore;
    use crate::testing::FakeMediaOutput;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Manager = AudioSinkManager<FakeMediaOutput, InMemoryTrackStore>;

    fn manager() -> (Manager, Arc<FakeMediaOutput>, Arc<InMemoryTrackStore>) {
        let output = Arc::new(FakeMediaOutput::new());
        let store = Arc::new(InMemoryTrackStore::new());
        let manager = AudioSinkManager::new(
            store.clone(),
            Arc::new(NotificationManager::new()),
            Arc::new(DeviceManager::new()),
            output.clone(),
            PlatformCapabilities::full(),
        );
        (manager, output, store)
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let (manager, output, _) = manager();
        manager.init(None).await;
        let first = manager.container_id().await;
        manager.init(Some("anchor")).await;
        assert_eq!(manager.container_id().await, first);
        assert_eq!(output.container_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_anchor_falls_back_to_root() {
        let (manager, output, _) = manager();
        manager.init(Some("nope")).await;
        let id = manager.container_id().await.unwrap();
        assert_eq!(output.container_parent(&id), Some(ParentNode::Root));
    }

    #[tokio::test]
    async fn test_existing_anchor_is_used() {
        let (manager, output, _) = manager();
        output.add_anchor("stage");
        manager.init(Some("stage")).await;
        let id = manager.container_id().await.unwrap();
        assert_eq!(
            output.container_parent(&id),
            Some(ParentNode::Anchor("stage".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rejected_play_publishes_once() {
        let (manager, output, _) = manager();
        output.block_autoplay(true);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        manager.add_event_listener(AUTOPLAY_ERROR, move |event| {
            assert_eq!(event.error.code, SdkException::AUTOPLAY_BLOCKED_CODE);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.init(None).await;
        manager.handle_track_added(Arc::new(AudioTrack::new("t1"))).await;

        assert!(manager.autoplay_failed().await);
        assert_eq!(manager.auto_paused_track_ids().await, vec!["t1"]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(output.play_attempts("t1"), 1);
    }

    #[tokio::test]
    async fn test_missing_element_is_a_noop() {
        let (manager, output, _) = manager();
        manager.init(None).await;
        let track = Arc::new(AudioTrack::new("ghost"));
        assert!(!manager.attempt_playback(track).await);
        assert_eq!(output.total_play_attempts(), 0);
    }

    #[tokio::test]
    async fn test_track_added_before_init_is_ignored() {
        let (manager, output, _) = manager();
        manager.handle_track_added(Arc::new(AudioTrack::new("t1"))).await;
        assert!(manager.bound_track_ids().await.is_empty());
        assert_eq!(output.element_count(), 0);
    }
}
