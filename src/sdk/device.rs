use crate::events::{EventRegistry, ListenerId};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

pub const AUDIO_DEVICE_CHANGE: &str = "audio-device-change";

/// Payload of `audio-device-change`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceChangeEvent {
    /// Set when the device switch failed
    pub error: Option<String>,
    /// Set for the initial enumeration at session start
    pub init: bool,
    /// Device id that became active, if any
    pub selection: Option<String>,
}

impl DeviceChangeEvent {
    pub fn selected(device_id: impl Into<String>) -> Self {
        Self {
            error: None,
            init: false,
            selection: Some(device_id.into()),
        }
    }

    pub fn initial() -> Self {
        Self {
            init: true,
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Tracks the active audio output device and announces changes
#[derive(Debug, Default)]
pub struct DeviceManager {
    registry: EventRegistry<DeviceChangeEvent>,
    output_device: RwLock<Option<String>>,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_device(&self) -> Option<String> {
        self.output_device
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Switch the output device and announce it to listeners
    pub fn select_output_device(&self, device_id: impl Into<String>) -> usize {
        let device_id = device_id.into();
        log::info!("Audio output device changed to {}", device_id);
        *self.output_device.write().unwrap_or_else(|p| p.into_inner()) = Some(device_id.clone());
        self.publish_audio_device_change(DeviceChangeEvent::selected(device_id))
    }

    pub fn publish_audio_device_change(&self, event: DeviceChangeEvent) -> usize {
        self.registry.publish(AUDIO_DEVICE_CHANGE, &event)
    }

    pub fn add_event_listener<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&DeviceChangeEvent) + Send + Sync + 'static,
    {
        self.registry.subscribe(event, listener)
    }

    pub fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        self.registry.unsubscribe(event, id)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.listener_count(event)
    }
}
