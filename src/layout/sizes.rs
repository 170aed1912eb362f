//! Page-by-page tile sizing
//!
//! [`calculate_layout_sizes`] picks one of four strategies depending on the
//! constraint: a cap on tiles per page, on rows, on columns, or none. When
//! tiles spill onto more than one page and the last page is only partially
//! filled, the last page gets its own independently computed tile size.

use crate::errors::RoomkitError;
use crate::layout::rect::largest_rect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(16.0, 9.0)
    }
}

/// Pagination constraint. A zero cap counts as no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutConstraint {
    #[default]
    Unconstrained,
    MaxTiles(usize),
    MaxRows(usize),
    MaxCols(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub count: usize,
    pub parent_width: f64,
    pub parent_height: f64,
    pub aspect_ratio: AspectRatio,
    pub constraint: LayoutConstraint,
}

/// Tile dimensions per page.
///
/// `last_page_*` are only meaningful when
/// `is_last_page_different_from_first_page` is set; otherwise they stay 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSizes {
    pub tiles_in_first_page: usize,
    pub default_width: f64,
    pub default_height: f64,
    pub last_page_width: f64,
    pub last_page_height: f64,
    pub is_last_page_different_from_first_page: bool,
}

/// Input shared by the three constrained strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstrainedLayout {
    pub parent_width: f64,
    pub parent_height: f64,
    pub count: usize,
    pub max_count: usize,
    pub aspect_ratio: AspectRatio,
}

impl ConstrainedLayout {
    fn container_ratio(&self) -> f64 {
        self.parent_width / self.parent_height
    }
}

/// Fill pages of at most `max_count` tiles using [`largest_rect`]
pub fn tile_sizes_with_page_constraint(
    layout: &ConstrainedLayout,
) -> Result<TileSizes, RoomkitError> {
    let ConstrainedLayout {
        parent_width,
        parent_height,
        count,
        max_count,
        aspect_ratio,
    } = *layout;
    if max_count == 0 {
        return Err(RoomkitError::InvalidLayout(
            "Maximum tiles per page must be positive".to_string(),
        ));
    }

    let first_page = largest_rect(
        parent_width,
        parent_height,
        count.min(max_count) as f64,
        Some(aspect_ratio.width),
        Some(aspect_ratio.height),
    )?;
    let mut sizes = TileSizes {
        tiles_in_first_page: count.min(max_count),
        default_width: first_page.width,
        default_height: first_page.height,
        ..TileSizes::default()
    };

    let tiles_in_last_page = count % max_count;
    sizes.is_last_page_different_from_first_page = tiles_in_last_page > 0 && count > max_count;
    if sizes.is_last_page_different_from_first_page {
        let last_page = largest_rect(
            parent_width,
            parent_height,
            tiles_in_last_page as f64,
            Some(aspect_ratio.width),
            Some(aspect_ratio.height),
        )?;
        sizes.last_page_width = last_page.width;
        sizes.last_page_height = last_page.height;
    }
    Ok(sizes)
}

/// Full-height rows, at most `max_count` of them; columns follow from tile width
pub fn tile_sizes_with_row_constraint(layout: &ConstrainedLayout) -> TileSizes {
    let aspect_ratio = layout.aspect_ratio.ratio();
    let rows_for = |tiles: usize| {
        let ideal = (tiles as f64 * aspect_ratio / layout.container_ratio()).sqrt().ceil();
        (ideal as usize).min(layout.max_count).max(1)
    };

    let rows = rows_for(layout.count);
    let height = layout.parent_height / rows as f64;
    let width = height * aspect_ratio;
    let cols = (layout.parent_width / width).floor() as usize;

    let mut sizes = TileSizes {
        default_width: width,
        default_height: height,
        ..TileSizes::default()
    };
    let page_size = rows.saturating_mul(cols);
    if page_size == 0 {
        log::debug!("Tile of {}x{} does not fit a single column", width, height);
        return sizes;
    }
    sizes.tiles_in_first_page = layout.count.min(page_size);

    let tiles_in_last_page = layout.count % page_size;
    sizes.is_last_page_different_from_first_page =
        tiles_in_last_page > 0 && layout.count > page_size;
    if sizes.is_last_page_different_from_first_page {
        let rows = rows_for(tiles_in_last_page);
        sizes.last_page_height = layout.parent_height / rows as f64;
        sizes.last_page_width = sizes.last_page_height * aspect_ratio;
    }
    sizes
}

/// Full-width columns, at most `max_count` of them; rows follow from tile height
pub fn tile_sizes_with_col_constraint(layout: &ConstrainedLayout) -> TileSizes {
    let aspect_ratio = layout.aspect_ratio.ratio();
    let cols_for = |tiles: usize| {
        let ideal = (tiles as f64 * layout.container_ratio() / aspect_ratio).sqrt().ceil();
        (ideal as usize).min(layout.max_count).max(1)
    };

    let cols = cols_for(layout.count);
    let width = layout.parent_width / cols as f64;
    let height = width / aspect_ratio;
    let rows = (layout.parent_height / height).floor() as usize;

    let mut sizes = TileSizes {
        default_width: width,
        default_height: height,
        ..TileSizes::default()
    };
    let page_size = rows.saturating_mul(cols);
    if page_size == 0 {
        log::debug!("Tile of {}x{} does not fit a single row", width, height);
        return sizes;
    }
    sizes.tiles_in_first_page = layout.count.min(page_size);

    let tiles_in_last_page = layout.count % page_size;
    sizes.is_last_page_different_from_first_page =
        tiles_in_last_page > 0 && layout.count > page_size;
    if sizes.is_last_page_different_from_first_page {
        let cols = cols_for(tiles_in_last_page);
        sizes.last_page_width = layout.parent_width / cols as f64;
        sizes.last_page_height = sizes.last_page_width / aspect_ratio;
    }
    sizes
}

/// Compute tile sizes for `request.count` tiles under `request.constraint`.
///
/// Zero tiles is not an error: the result is all zeros.
pub fn calculate_layout_sizes(request: &LayoutRequest) -> Result<TileSizes, RoomkitError> {
    if request.count == 0 {
        return Ok(TileSizes::default());
    }
    let constrained = |max_count| ConstrainedLayout {
        parent_width: request.parent_width,
        parent_height: request.parent_height,
        count: request.count,
        max_count,
        aspect_ratio: request.aspect_ratio,
    };

    match request.constraint {
        LayoutConstraint::MaxTiles(max) if max > 0 => {
            tile_sizes_with_page_constraint(&constrained(max))
        }
        LayoutConstraint::MaxRows(max) if max > 0 => {
            Ok(tile_sizes_with_row_constraint(&constrained(max)))
        }
        LayoutConstraint::MaxCols(max) if max > 0 => {
            Ok(tile_sizes_with_col_constraint(&constrained(max)))
        }
        _ => {
            let best = largest_rect(
                request.parent_width,
                request.parent_height,
                request.count as f64,
                Some(request.aspect_ratio.width),
                Some(request.aspect_ratio.height),
            )?;
            Ok(TileSizes {
                tiles_in_first_page: request.count,
                default_width: best.width,
                default_height: best.height,
                ..TileSizes::default()
            })
        }
    }
}
