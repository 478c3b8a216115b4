use imstack_image::{ImageError, ImageSize, ImageStack};

use crate::crop::crop_stack;

/// A tile of a chunked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Tile index along the height axis.
    pub row: usize,
    /// Tile index along the width axis.
    pub col: usize,
    /// Top pixel row of the tile in the source image.
    pub y: usize,
    /// Left pixel column of the tile in the source image.
    pub x: usize,
    /// Size of the tile.
    pub size: ImageSize,
}

/// Compute the tiles of `tile` size that fit entirely inside `image`.
///
/// The tile counts are `image.height / tile.height` and `image.width / tile.width`;
/// the remainder rows and columns are not covered. Tiles are returned in
/// row-major order of their `(row, col)` index.
///
/// # Errors
///
/// Returns [`ImageError::InvalidTileSize`] if a tile dimension is zero.
///
/// # Examples
///
/// ```
/// use imstack_image::ImageSize;
/// use imstack_imgproc::chunk::chunk_grid;
///
/// let tiles = chunk_grid(
///     ImageSize { width: 10, height: 7 },
///     ImageSize { width: 4, height: 3 },
/// ).unwrap();
///
/// assert_eq!(tiles.len(), 4);
/// assert_eq!((tiles[3].y, tiles[3].x), (3, 4));
/// ```
pub fn chunk_grid(image: ImageSize, tile: ImageSize) -> Result<Vec<Tile>, ImageError> {
    if tile.width == 0 || tile.height == 0 {
        return Err(ImageError::InvalidTileSize(tile));
    }

    let rows = image.height / tile.height;
    let cols = image.width / tile.width;

    let tiles = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .map(|(row, col)| Tile {
            row,
            col,
            y: row * tile.height,
            x: col * tile.width,
            size: tile,
        })
        .collect();

    Ok(tiles)
}

/// Split a stack into tiles.
///
/// Every tile keeps the batch and channel axes of the source.
pub fn chunk_stack<T>(
    src: &ImageStack<T>,
    tile: ImageSize,
) -> Result<Vec<(Tile, ImageStack<T>)>, ImageError>
where
    T: Copy + Send + Sync + Default,
{
    let dims = src.dims()?;
    chunk_grid(dims.size(), tile)?
        .into_iter()
        .map(|t| Ok((t, crop_stack(src, t.y, t.x, t.size)?)))
        .collect()
}
