use crate::errors::RoomkitError;
use serde::{Deserialize, Serialize};

/// Best grid found by [`largest_rect`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectFit {
    pub area: f64,
    pub cols: usize,
    pub rows: usize,
    pub width: f64,
    pub height: f64,
}

/// Find the largest tile size when placing `num_rects` equally sized tiles,
/// without rotation, into a `container_width` x `container_height` box.
///
/// Tiles keep the `tile_width / tile_height` aspect ratio. Every column count
/// from `num_rects` down to 1 is tried with `rows = ceil(num_rects / cols)`,
/// scaling tiles to whichever container axis binds first, and the grid with
/// the largest tile area wins.
///
/// A missing or zero aspect ratio component yields an all-zero fit.
///
/// # Errors
/// `InvalidLayout` for a negative container side, a `num_rects` that is not a
/// positive integer, or a NaN aspect ratio component.
pub fn largest_rect(
    container_width: f64,
    container_height: f64,
    num_rects: f64,
    tile_width: Option<f64>,
    tile_height: Option<f64>,
) -> Result<RectFit, RoomkitError> {
    if container_width < 0.0 || container_height < 0.0 {
        return Err(RoomkitError::InvalidLayout(
            "Container must have a non-negative area".to_string(),
        ));
    }
    if !num_rects.is_finite() || num_rects < 1.0 || num_rects.fract() != 0.0 {
        return Err(RoomkitError::InvalidLayout(
            "Number of shapes to place must be a positive integer".to_string(),
        ));
    }
    let aspect_ratio = match (tile_width, tile_height) {
        (Some(w), Some(h)) if w.is_nan() || h.is_nan() => {
            return Err(RoomkitError::InvalidLayout(
                "Aspect ratio must be a number".to_string(),
            ));
        }
        (Some(w), Some(h)) if w != 0.0 && h != 0.0 => w / h,
        _ => return Ok(RectFit::default()),
    };

    let num_rects = num_rects as usize;
    let mut best = RectFit::default();
    for cols in (1..=num_rects).rev() {
        let rows = num_rects.div_ceil(cols);
        let h_scale = container_width / (cols as f64 * aspect_ratio);
        let v_scale = container_height / rows as f64;
        let (width, height) = if h_scale <= v_scale {
            let width = container_width / cols as f64;
            (width, width / aspect_ratio)
        } else {
            let height = container_height / rows as f64;
            (height * aspect_ratio, height)
        };
        let area = width * height;
        if area > best.area {
            best = RectFit {
                area,
                cols,
                rows,
                width,
                height,
            };
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(w: f64, h: f64, n: f64) -> Result<RectFit, RoomkitError> {
        largest_rect(w, h, n, Some(16.0), Some(9.0))
    }

    #[test]
    fn test_single_tile_fills_width() {
        let best = fit(1600.0, 900.0, 1.0).unwrap();
        assert_eq!((best.cols, best.rows), (1, 1));
        assert!((best.width - 1600.0).abs() < 1e-9);
        assert!((best.height - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_four_tiles_make_a_square_grid() {
        let best = fit(1600.0, 900.0, 4.0).unwrap();
        assert_eq!((best.cols, best.rows), (2, 2));
        assert!((best.width - 800.0).abs() < 1e-9);
        assert!((best.height - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_tall_container_stacks_rows() {
        let best = fit(160.0, 900.0, 3.0).unwrap();
        assert_eq!(best.cols, 1);
        assert_eq!(best.rows, 3);
    }

    #[test]
    fn test_rejects_negative_container() {
        assert!(fit(-1.0, 100.0, 1.0).is_err());
        assert!(fit(100.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_counts() {
        assert!(fit(100.0, 100.0, 0.0).is_err());
        assert!(fit(100.0, 100.0, 2.5).is_err());
        assert!(fit(100.0, 100.0, f64::NAN).is_err());
        assert!(fit(100.0, 100.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_nan_aspect_ratio() {
        match largest_rect(100.0, 100.0, 2.0, Some(f64::NAN), Some(9.0)) {
            Err(RoomkitError::InvalidLayout(msg)) => assert_eq!(msg, "Aspect ratio must be a number"),
            other => panic!("expected InvalidLayout, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_aspect_ratio_is_empty_fit() {
        let best = largest_rect(100.0, 100.0, 2.0, None, Some(9.0)).unwrap();
        assert_eq!(best, RectFit::default());
        let best = largest_rect(100.0, 100.0, 2.0, Some(0.0), Some(9.0)).unwrap();
        assert_eq!(best, RectFit::default());
    }
}
