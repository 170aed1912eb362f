//! roomkit: audio sink lifecycle and tile layout for conferencing front-ends
//!
//! This crate holds the two pieces of a video-conferencing UI that do real
//! work outside of rendering:
//!
//! # Features
//! - Audio sink manager: one hidden playable element per remote audio track
//! - Autoplay recovery: failed play requests are parked and retried on a user
//!   gesture or an output device change
//! - Grid packing: largest uniform tile size for N tiles in a box
//! - Pagination by tiles, rows or columns per page
//!
//! # Usage
//! ```rust,ignore
//! use roomkit::layout::{calculate_layout_sizes, AspectRatio, LayoutConstraint, LayoutRequest};
//!
//! let sizes = calculate_layout_sizes(&LayoutRequest {
//!     count: 10,
//!     parent_width: 1280.0,
//!     parent_height: 720.0,
//!     aspect_ratio: AspectRatio::new(16.0, 9.0),
//!     constraint: LayoutConstraint::MaxTiles(9),
//! })?;
//! ```
pub mod config;
pub mod errors;
pub mod events;
pub mod layout;
pub mod platform;
pub mod sdk;
pub mod sink;

// Testing utilities - in-memory media output for offline testing
pub mod testing;

// Re-exports for convenience
pub use config::RoomkitConfig;
pub use errors::{RoomkitError, SdkException};
pub use layout::{calculate_layout_sizes, largest_rect, LayoutConstraint, LayoutRequest, TileSizes};
pub use platform::PlatformCapabilities;
pub use sink::{AudioSinkManager, AudioTrack, MediaOutput, TrackStore};

/// Initialize logging
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "roomkit=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
