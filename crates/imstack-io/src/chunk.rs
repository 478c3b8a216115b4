use std::path::{Path, PathBuf};

use imstack_image::{ops::to_u8_scaled, ImageError, ImageSize, ImageStack, Sample};
use imstack_imgproc::chunk::{chunk_stack, Tile};

use crate::{error::IoError, png::write_image_png_u8};

/// The file name a tile is written to: `image-RR-CC.png`.
///
/// Tile indices are zero-padded to two digits and grow beyond that when needed.
pub fn tile_file_name(tile: &Tile) -> String {
    format!("image-{:02}-{:02}.png", tile.row, tile.col)
}

/// Cut an image into tiles and write each tile as an 8-bit PNG.
///
/// Samples are expected in `[0, 1]`; they are scaled by 255, rounded to the
/// nearest byte and saturated before encoding. This differs from a truncating
/// `as u8` cast: `0.999` is written as 255, not 254. Only the tiles that fit
/// entirely in the image are written.
///
/// # Arguments
///
/// * `image` - The image with shape (H, W, C), C in 1..=4.
/// * `tile` - The size of each tile.
/// * `output_dir` - An existing directory to write the tiles into.
///
/// # Returns
///
/// The paths of the written tiles, in row-major tile order.
pub fn chunk_image<T: Sample>(
    image: &ImageStack<T>,
    tile: ImageSize,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, IoError> {
    let output_dir = output_dir.as_ref();
    if !output_dir.is_dir() {
        return Err(IoError::NotADirectory(output_dir.to_path_buf()));
    }

    let dims = image.dims()?;
    if dims.batch != 1 {
        return Err(ImageError::ExpectedSingleImage(dims.batch).into());
    }

    let image_u8 = to_u8_scaled(image);
    let tiles = chunk_stack(&image_u8, tile)?;

    let mut paths = Vec::with_capacity(tiles.len());
    for (t, tile_image) in tiles {
        let path = output_dir.join(tile_file_name(&t));
        write_image_png_u8(&path, &tile_image)?;
        log::debug!("wrote tile ({}, {}) to {}", t.row, t.col, path.display());
        paths.push(path);
    }

    log::info!(
        "wrote {} tiles of {} to {}",
        paths.len(),
        tile,
        output_dir.display()
    );

    Ok(paths)
}
