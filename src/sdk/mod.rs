//! SDK-side event sources the sink manager listens to
//!
//! - `notification`: remote track lifecycle (`track-added`, `track-removed`)
//! - `device`: output device selection and `audio-device-change`

pub mod device;
pub mod notification;

pub use device::{DeviceChangeEvent, DeviceManager, AUDIO_DEVICE_CHANGE};
pub use notification::{NotificationManager, TRACK_ADDED, TRACK_REMOVED};
