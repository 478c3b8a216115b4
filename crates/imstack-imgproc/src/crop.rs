use imstack_image::{ImageError, ImageSize, ImageStack};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Crop every image of a stack to the same region.
///
/// Leading batch axes and the channel axis are kept.
///
/// # Arguments
///
/// * `src` - The source stack with shape (..., H, W, C).
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `size` - The size of the region.
///
/// # Examples
///
/// ```rust
/// use imstack_image::{ImageSize, ImageStack};
/// use imstack_imgproc::crop::crop_stack;
///
/// let image = ImageStack::new([4, 4, 1], vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let cropped = crop_stack(&image, 1, 1, ImageSize { width: 2, height: 2 }).unwrap();
///
/// assert_eq!(cropped.shape(), &[2, 2, 1]);
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_stack<T>(
    src: &ImageStack<T>,
    y: usize,
    x: usize,
    size: ImageSize,
) -> Result<ImageStack<T>, ImageError>
where
    T: Copy + Send + Sync + Default,
{
    let dims = src.dims()?;
    if y + size.height > dims.height || x + size.width > dims.width {
        return Err(ImageError::RegionOutOfBounds(y, x, size, dims.size()));
    }

    let ndim = src.ndim();
    let mut shape = src.shape().to_vec();
    shape[ndim - 3] = size.height;
    shape[ndim - 2] = size.width;

    let mut dst = ImageStack::from_shape_val(shape, T::default());
    let dst_row_len = size.width * dims.channels;
    if dst_row_len == 0 || size.height == 0 {
        return Ok(dst);
    }

    let src_data = src.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_row_len)
        .enumerate()
        .for_each(|(i, dst_row)| {
            let (image, r) = (i / size.height, i % size.height);
            // get the slice at the left edge of the region
            let offset = image * dims.image_len() + (y + r) * dims.row_len() + x * dims.channels;
            dst_row.copy_from_slice(&src_data[offset..offset + dst_row_len]);
        });

    Ok(dst)
}
