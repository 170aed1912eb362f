//! Platform capability checks
//!
//! Browser feature detection is replaced by a capability object handed to
//! the sink manager at construction, so hosts without a document (tests,
//! native shells) can describe what they support.

use crate::errors::RoomkitError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    /// Media device enumeration is available (secure context)
    pub media_devices_available: bool,
    /// Audio elements can be routed to a chosen output device
    pub output_selection_supported: bool,
}

impl PlatformCapabilities {
    /// Everything supported, the common desktop browser case
    pub fn full() -> Self {
        Self {
            media_devices_available: true,
            output_selection_supported: true,
        }
    }

    /// Media devices present but output routing unsupported
    pub fn without_output_selection() -> Self {
        Self {
            media_devices_available: true,
            output_selection_supported: false,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Media devices are missing in insecure contexts and headless hosts
pub fn validate_media_devices(capabilities: &PlatformCapabilities) -> Result<(), RoomkitError> {
    if !capabilities.media_devices_available {
        let error = RoomkitError::MissingMediaDevices(
            "media devices are not exposed by this platform (insecure context?)".to_string(),
        );
        log::error!("{}", error);
        return Err(error);
    }
    Ok(())
}
