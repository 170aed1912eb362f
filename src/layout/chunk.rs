use crate::layout::sizes::TileSizes;

/// An element paired with the tile size of the page it landed on
#[derive(Debug, Clone, PartialEq)]
pub struct SizedTile<T> {
    pub element: T,
    pub width: f64,
    pub height: f64,
}

/// Split `elements` into pages of `chunk_size`, keeping order.
///
/// With `only_one_page` everything past the first page is dropped. A
/// `chunk_size` of 0 yields no pages.
pub fn chunk<T: Clone>(elements: &[T], chunk_size: usize, only_one_page: bool) -> Vec<Vec<T>> {
    if chunk_size == 0 {
        return Vec::new();
    }
    let pages = elements.chunks(chunk_size).map(<[T]>::to_vec);
    if only_one_page {
        pages.take(1).collect()
    } else {
        pages.collect()
    }
}

/// Paginate `elements` by `sizes.tiles_in_first_page` and attach tile
/// dimensions: the last page's when it differs and this is the last page,
/// the default otherwise.
pub fn chunk_elements<T: Clone>(
    elements: &[T],
    sizes: &TileSizes,
    only_one_page: bool,
) -> Vec<Vec<SizedTile<T>>> {
    let pages = chunk(elements, sizes.tiles_in_first_page, only_one_page);
    let last_index = pages.len().saturating_sub(1);
    pages
        .into_iter()
        .enumerate()
        .map(|(page, tiles)| {
            let use_last = sizes.is_last_page_different_from_first_page && page == last_index;
            let (width, height) = if use_last {
                (sizes.last_page_width, sizes.last_page_height)
            } else {
                (sizes.default_width, sizes.default_height)
            };
            tiles
                .into_iter()
                .map(|element| SizedTile {
                    element,
                    width,
                    height,
                })
                .collect()
        })
        .collect()
}
