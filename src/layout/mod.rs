//! Tile layout packing
//!
//! Pure functions, no I/O:
//! - `rect`: largest uniform tile for N tiles in a box
//! - `sizes`: per-page tile sizes under a pagination constraint
//! - `chunk`: split tiles into pages and attach sizes
//! - `tiles`: build tiles from peers and infer the dominant aspect ratio

pub mod chunk;
pub mod rect;
pub mod sizes;
pub mod tiles;

pub use chunk::{chunk, chunk_elements, SizedTile};
pub use rect::{largest_rect, RectFit};
pub use sizes::{
    calculate_layout_sizes, tile_sizes_with_col_constraint, tile_sizes_with_page_constraint,
    tile_sizes_with_row_constraint, AspectRatio, ConstrainedLayout, LayoutConstraint,
    LayoutRequest, TileSizes,
};
pub use tiles::{
    get_mode_aspect_ratio, get_video_tracks_from_peers, mode, Peer, TrackInfo, TrackKind,
    TrackSource, TrackWithPeer,
};
