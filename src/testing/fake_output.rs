//! In-memory media output
//!
//! Records everything the sink manager does to the page and lets tests
//! script playback outcomes: block autoplay globally, fail specific elements,
//! delay resolution, or fire an external pause on an element.

use crate::sink::output::{MediaOutput, ParentNode, PauseListener, PlaybackError};
use crate::sink::track::MediaStream;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct FakeElement {
    container_id: String,
    source: Option<MediaStream>,
    volume: Option<f64>,
    output_device: Option<String>,
    pause_listener: Option<Arc<dyn Fn(&str) + Send + Sync>>,
    playing: bool,
}

#[derive(Default)]
struct FakeState {
    anchors: HashSet<String>,
    containers: HashMap<String, ParentNode>,
    elements: HashMap<String, FakeElement>,
    removed: Vec<String>,
    play_attempts: HashMap<String, usize>,
    autoplay_blocked: bool,
    failing: HashSet<String>,
    play_delay: Option<Duration>,
}

#[derive(Default)]
pub struct FakeMediaOutput {
    state: Mutex<FakeState>,
}

impl FakeMediaOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn add_anchor(&self, anchor_id: &str) {
        self.lock().anchors.insert(anchor_id.to_string());
    }

    /// Reject every play request until unblocked
    pub fn block_autoplay(&self, blocked: bool) {
        self.lock().autoplay_blocked = blocked;
    }

    /// Reject play requests for one element regardless of autoplay state
    pub fn fail_element(&self, element_id: &str, failing: bool) {
        let mut state = self.lock();
        if failing {
            state.failing.insert(element_id.to_string());
        } else {
            state.failing.remove(element_id);
        }
    }

    /// Resolve play requests only after `delay` (tokio time)
    pub fn set_play_delay(&self, delay: Option<Duration>) {
        self.lock().play_delay = delay;
    }

    /// Simulate the element pausing on its own. Returns false if nothing listened.
    pub fn pause_element(&self, element_id: &str) -> bool {
        let listener = {
            let mut state = self.lock();
            let Some(element) = state.elements.get_mut(element_id) else {
                return false;
            };
            element.playing = false;
            element.pause_listener.clone()
        };
        match listener {
            Some(listener) => {
                listener(element_id);
                true
            }
            None => false,
        }
    }

    pub fn container_count(&self) -> usize {
        self.lock().containers.len()
    }

    pub fn container_parent(&self, container_id: &str) -> Option<ParentNode> {
        self.lock().containers.get(container_id).cloned()
    }

    pub fn element_count(&self) -> usize {
        self.lock().elements.len()
    }

    pub fn has_element(&self, element_id: &str) -> bool {
        self.lock().elements.contains_key(element_id)
    }

    pub fn element_container(&self, element_id: &str) -> Option<String> {
        self.lock()
            .elements
            .get(element_id)
            .map(|e| e.container_id.clone())
    }

    pub fn element_source(&self, element_id: &str) -> Option<MediaStream> {
        self.lock()
            .elements
            .get(element_id)
            .and_then(|e| e.source.clone())
    }

    pub fn element_volume(&self, element_id: &str) -> Option<f64> {
        self.lock().elements.get(element_id).and_then(|e| e.volume)
    }

    pub fn element_output_device(&self, element_id: &str) -> Option<String> {
        self.lock()
            .elements
            .get(element_id)
            .and_then(|e| e.output_device.clone())
    }

    pub fn has_pause_listener(&self, element_id: &str) -> bool {
        self.lock()
            .elements
            .get(element_id)
            .is_some_and(|e| e.pause_listener.is_some())
    }

    pub fn is_playing(&self, element_id: &str) -> bool {
        self.lock().elements.get(element_id).is_some_and(|e| e.playing)
    }

    /// Element ids in the order they were removed
    pub fn removed_elements(&self) -> Vec<String> {
        self.lock().removed.clone()
    }

    pub fn play_attempts(&self, element_id: &str) -> usize {
        self.lock().play_attempts.get(element_id).copied().unwrap_or(0)
    }

    pub fn total_play_attempts(&self) -> usize {
        self.lock().play_attempts.values().sum()
    }
}

impl MediaOutput for FakeMediaOutput {
    fn has_anchor(&self, anchor_id: &str) -> bool {
        self.lock().anchors.contains(anchor_id)
    }

    fn create_container(&self, container_id: &str, parent: &ParentNode) {
        self.lock()
            .containers
            .insert(container_id.to_string(), parent.clone());
    }

    fn remove_container(&self, container_id: &str) {
        let mut state = self.lock();
        state.containers.remove(container_id);
        let orphaned: Vec<String> = state
            .elements
            .iter()
            .filter(|(_, e)| e.container_id == container_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in orphaned {
            state.elements.remove(&id);
            state.removed.push(id);
        }
    }

    fn create_element(&self, element_id: &str, container_id: &str) {
        self.lock().elements.insert(
            element_id.to_string(),
            FakeElement {
                container_id: container_id.to_string(),
                ..FakeElement::default()
            },
        );
    }

    fn attach_source(&self, element_id: &str, stream: Option<&MediaStream>) {
        if let Some(element) = self.lock().elements.get_mut(element_id) {
            element.source = stream.cloned();
            if element.source.is_none() {
                element.playing = false;
            }
        }
    }

    fn set_volume(&self, element_id: &str, volume: f64) {
        if let Some(element) = self.lock().elements.get_mut(element_id) {
            element.volume = Some(volume);
        }
    }

    fn set_output_device(&self, element_id: &str, device_id: &str) {
        if let Some(element) = self.lock().elements.get_mut(element_id) {
            element.output_device = Some(device_id.to_string());
        }
    }

    fn add_pause_listener(&self, element_id: &str, listener: PauseListener) {
        if let Some(element) = self.lock().elements.get_mut(element_id) {
            element.pause_listener = Some(Arc::from(listener));
        }
    }

    fn remove_pause_listener(&self, element_id: &str) {
        if let Some(element) = self.lock().elements.get_mut(element_id) {
            element.pause_listener = None;
        }
    }

    fn play(&self, element_id: &str) -> impl Future<Output = Result<(), PlaybackError>> {
        let (delay, outcome) = {
            let mut state = self.lock();
            *state.play_attempts.entry(element_id.to_string()).or_insert(0) += 1;
            let outcome = if !state.elements.contains_key(element_id) {
                Err(PlaybackError::Detached(element_id.to_string()))
            } else if state.autoplay_blocked || state.failing.contains(element_id) {
                Err(PlaybackError::NotAllowed(
                    "play() failed because the user didn't interact with the document first"
                        .to_string(),
                ))
            } else {
                if let Some(element) = state.elements.get_mut(element_id) {
                    element.playing = true;
                }
                Ok(())
            };
            (state.play_delay, outcome)
        };
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }

    fn remove(&self, element_id: &str) {
        let mut state = self.lock();
        if state.elements.remove(element_id).is_some() {
            state.removed.push(element_id.to_string());
        }
    }
}
