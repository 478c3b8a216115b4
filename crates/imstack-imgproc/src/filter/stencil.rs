use imstack_image::{ImageError, ImageStack, Sample, StackDims};

use super::kernels::{check_kernel, KERNEL_RADIUS};
use crate::parallel::{self, ExecutionStrategy};

/// How neighbours that fall outside the image along the filtered axis are handled.
///
/// The same rule is applied independently by both stencil appliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Out-of-range neighbours contribute zero to the weighted sum.
    ///
    /// Example: ...0 0 0 | a b c d...
    Zero,

    /// Out-of-range neighbours take the value of the nearest in-range sample.
    ///
    /// Example: ...a a a | a b c d...
    Replicate,

    /// Only outputs whose whole window lies inside the image are computed.
    ///
    /// The first and last [`KERNEL_RADIUS`] positions along the filtered axis
    /// are set to zero. This is the default: an output is either a full
    /// 21-tap sum or zero.
    #[default]
    Valid,
}

impl BorderMode {
    /// Maps index `i` to the in-range index to read, or `None` to skip the tap.
    #[inline]
    fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        match self {
            BorderMode::Zero | BorderMode::Valid => {
                (i >= 0 && i < len as isize).then_some(i as usize)
            }
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
        }
    }

    /// Whether the output at position `i` along an axis of length `len` is computed.
    #[inline]
    fn computes(&self, i: usize, len: usize) -> bool {
        match self {
            BorderMode::Valid => i >= KERNEL_RADIUS && i + KERNEL_RADIUS < len,
            _ => true,
        }
    }
}

impl std::str::FromStr for BorderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(BorderMode::Zero),
            "replicate" => Ok(BorderMode::Replicate),
            "valid" => Ok(BorderMode::Valid),
            _ => Err(format!("unknown border mode: {s}")),
        }
    }
}

/// The spatial axis a kernel is applied along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilAxis {
    /// The width axis.
    X,
    /// The height axis.
    Y,
}

#[inline]
fn tap_position(i: usize, k: usize) -> isize {
    i as isize + k as isize - KERNEL_RADIUS as isize
}

fn filter_row_x<T: Sample, U: Sample>(
    src_row: &[T],
    dst_row: &mut [U],
    kernel: &[f64],
    dims: StackDims,
    border: BorderMode,
) {
    let channels = dims.channels;

    for (x, dst_pixel) in dst_row.chunks_exact_mut(channels).enumerate() {
        if !border.computes(x, dims.width) {
            continue;
        }

        for (ch, dst_val) in dst_pixel.iter_mut().enumerate() {
            let mut acc = 0.0f64;
            for (k, &w) in kernel.iter().enumerate() {
                if let Some(xi) = border.map_index(tap_position(x, k), dims.width) {
                    acc += w * src_row[xi * channels + ch].to_f64();
                }
            }
            *dst_val = U::from_f64(acc);
        }
    }
}

fn filter_row_y<T: Sample, U: Sample>(
    src_image: &[T],
    dst_row: &mut [U],
    y: usize,
    kernel: &[f64],
    dims: StackDims,
    border: BorderMode,
) {
    if !border.computes(y, dims.height) {
        return;
    }

    let row_len = dims.row_len();
    let mut acc = vec![0.0f64; row_len];

    for (k, &w) in kernel.iter().enumerate() {
        if let Some(yi) = border.map_index(tap_position(y, k), dims.height) {
            let src_row = &src_image[yi * row_len..(yi + 1) * row_len];
            acc.iter_mut()
                .zip(src_row.iter())
                .for_each(|(a, s)| *a += w * s.to_f64());
        }
    }

    dst_row
        .iter_mut()
        .zip(acc)
        .for_each(|(d, a)| *d = U::from_f64(a));
}

/// Apply a 21-tap kernel along one spatial axis of an image stack.
///
/// The output has the shape of the input. The input may carry leading batch
/// axes `(N..., H, W, C)`: every image is filtered independently and every
/// channel passes through unchanged. Samples are accumulated in `f64` and
/// stored through [`Sample::from_f64`].
///
/// # Arguments
///
/// * `src` - The source stack with shape (..., H, W, C).
/// * `kernel` - The 21 weights; index 10 is the center tap.
/// * `axis` - The axis to filter along.
/// * `border` - The rule for neighbours outside the image.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
///
/// # Errors
///
/// [`ImageError::InvalidKernelLength`] when the kernel does not have 21 taps,
/// [`ImageError::InvalidShape`] when the stack has fewer than 3 axes. Both are
/// checked before any computation.
pub fn apply_kernel<T: Sample, U: Sample>(
    src: &ImageStack<T>,
    kernel: &[f64],
    axis: StencilAxis,
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<ImageStack<U>, ImageError> {
    check_kernel(kernel)?;
    let dims = src.dims()?;

    let mut dst = ImageStack::from_shape_val(src.shape(), U::zero());
    if dst.is_empty() {
        return Ok(dst);
    }

    let parallel = strategy.is_parallel(dims.num_pixels());
    log::debug!(
        "apply_kernel: axis {:?}, border {:?}, dims {:?}, parallel {}",
        axis,
        border,
        dims,
        parallel
    );

    let src_data = src.as_slice();
    let row_len = dims.row_len();
    let image_len = dims.image_len();

    parallel::for_each_row(dst.as_slice_mut(), row_len, parallel, |row, dst_row| {
        let (image, y) = (row / dims.height, row % dims.height);
        match axis {
            StencilAxis::X => {
                let src_row = &src_data[row * row_len..(row + 1) * row_len];
                filter_row_x(src_row, dst_row, kernel, dims, border)
            }
            StencilAxis::Y => {
                let src_image = &src_data[image * image_len..(image + 1) * image_len];
                filter_row_y(src_image, dst_row, y, kernel, dims, border)
            }
        }
    });

    Ok(dst)
}

/// Apply a kernel along the x-axis (width) of an image stack.
///
/// `dst[y, x, c] = sum_k kernel[k] * src[y, x + k - 10, c]` with [`BorderMode::Valid`]
/// and [`ExecutionStrategy::Auto`]: columns closer than 10 pixels to the left or
/// right edge are set to zero. For explicit control use [`apply_kernel_x_with`].
///
/// # Examples
///
/// ```
/// use imstack_image::ImageStack;
/// use imstack_imgproc::filter::{apply_kernel_x, kernels};
///
/// let image = ImageStack::from_shape_val([1, 23, 1], 1.0f32);
/// let filtered = apply_kernel_x(&image, &kernels::box_kernel()).unwrap();
///
/// // only x = 10..13 have their whole window inside the row
/// assert_eq!(filtered.as_slice()[9], 0.0);
/// assert!((filtered.as_slice()[10] - 1.0).abs() < 1e-6);
/// assert!((filtered.as_slice()[12] - 1.0).abs() < 1e-6);
/// assert_eq!(filtered.as_slice()[13], 0.0);
/// ```
pub fn apply_kernel_x<T: Sample>(
    src: &ImageStack<T>,
    kernel: &[f64],
) -> Result<ImageStack<T>, ImageError> {
    apply_kernel_x_with(src, kernel, BorderMode::default(), ExecutionStrategy::Auto)
}

/// Apply a kernel along the x-axis with border and execution strategy control.
pub fn apply_kernel_x_with<T: Sample>(
    src: &ImageStack<T>,
    kernel: &[f64],
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<ImageStack<T>, ImageError> {
    apply_kernel(src, kernel, StencilAxis::X, border, strategy)
}

/// Apply a kernel along the y-axis (height) of an image stack.
///
/// `dst[y, x, c] = sum_k kernel[k] * src[y + k - 10, x, c]` with [`BorderMode::Valid`]
/// and [`ExecutionStrategy::Auto`]: rows closer than 10 pixels to the top or
/// bottom edge are set to zero. For explicit control use [`apply_kernel_y_with`].
pub fn apply_kernel_y<T: Sample>(
    src: &ImageStack<T>,
    kernel: &[f64],
) -> Result<ImageStack<T>, ImageError> {
    apply_kernel_y_with(src, kernel, BorderMode::default(), ExecutionStrategy::Auto)
}

/// Apply a kernel along the y-axis with border and execution strategy control.
pub fn apply_kernel_y_with<T: Sample>(
    src: &ImageStack<T>,
    kernel: &[f64],
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<ImageStack<T>, ImageError> {
    apply_kernel(src, kernel, StencilAxis::Y, border, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::{box_kernel, identity_kernel, KERNEL_SIZE};

    fn zero_x<T: Sample>(
        src: &ImageStack<T>,
        kernel: &[f64],
    ) -> Result<ImageStack<T>, ImageError> {
        apply_kernel_x_with(src, kernel, BorderMode::Zero, ExecutionStrategy::Serial)
    }

    fn zero_y<T: Sample>(
        src: &ImageStack<T>,
        kernel: &[f64],
    ) -> Result<ImageStack<T>, ImageError> {
        apply_kernel_y_with(src, kernel, BorderMode::Zero, ExecutionStrategy::Serial)
    }

    fn shifted_kernel(offset: isize) -> Vec<f64> {
        let mut kernel = vec![0.0; KERNEL_SIZE];
        kernel[(KERNEL_RADIUS as isize + offset) as usize] = 1.0;
        kernel
    }

    #[test]
    fn test_border_mode_from_str() {
        assert_eq!("zero".parse(), Ok(BorderMode::Zero));
        assert_eq!("Replicate".parse(), Ok(BorderMode::Replicate));
        assert_eq!("valid".parse(), Ok(BorderMode::Valid));
        assert!("reflect".parse::<BorderMode>().is_err());
    }

    #[test]
    fn test_invalid_kernel_length() {
        let image = ImageStack::from_shape_val([3, 3, 1], 1.0f32);
        for len in [0, 20, 22] {
            let kernel = vec![1.0; len];
            assert_eq!(
                apply_kernel_x(&image, &kernel),
                Err(ImageError::InvalidKernelLength(len, KERNEL_SIZE))
            );
            assert_eq!(
                apply_kernel_y(&image, &kernel),
                Err(ImageError::InvalidKernelLength(len, KERNEL_SIZE))
            );
        }
    }

    #[test]
    fn test_default_border_is_valid() -> Result<(), ImageError> {
        assert_eq!(BorderMode::default(), BorderMode::Valid);

        let image = ImageStack::from_shape_val([21, 21, 1], 1.0f64);
        let x = apply_kernel_x(&image, &box_kernel())?;
        let y = apply_kernel_y(&image, &box_kernel())?;

        // partial windows are not summed
        assert_eq!(x.get(&[5, 0, 0]), Some(&0.0));
        assert_eq!(x.get(&[5, 20, 0]), Some(&0.0));
        assert_eq!(y.get(&[0, 5, 0]), Some(&0.0));
        assert_eq!(y.get(&[20, 5, 0]), Some(&0.0));

        let (center_x, center_y) = (x.get(&[5, 10, 0]), y.get(&[10, 5, 0]));
        assert!((center_x.copied().unwrap_or(0.0) - 1.0).abs() < 1e-12);
        assert!((center_y.copied().unwrap_or(0.0) - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_invalid_shape() {
        let plane = ImageStack::from_shape_val([3, 3], 1.0f32);
        assert_eq!(
            apply_kernel_x(&plane, &identity_kernel()),
            Err(ImageError::InvalidShape(vec![3, 3]))
        );
        assert_eq!(
            apply_kernel_y(&plane, &identity_kernel()),
            Err(ImageError::InvalidShape(vec![3, 3]))
        );

        let no_channels = ImageStack::from_shape_val([3, 3, 0], 1.0f32);
        assert_eq!(
            apply_kernel_x(&no_channels, &identity_kernel()),
            Err(ImageError::InvalidShape(vec![3, 3, 0]))
        );
    }

    #[test]
    fn test_shift_kernel_x() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = ImageStack::new([2, 4, 1], vec![
            1.0f32, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
        ])?;

        // dst[x] = src[x + 1]
        let shifted = zero_x(&image, &shifted_kernel(1))?;

        #[rustfmt::skip]
        assert_eq!(shifted.as_slice(), &[
            2.0, 3.0, 4.0, 0.0,
            6.0, 7.0, 8.0, 0.0,
        ]);
        Ok(())
    }

    #[test]
    fn test_shift_kernel_y() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = ImageStack::new([3, 2, 1], vec![
            1.0f32, 2.0,
            3.0, 4.0,
            5.0, 6.0,
        ])?;

        // dst[y] = src[y - 1]
        let shifted = zero_y(&image, &shifted_kernel(-1))?;

        #[rustfmt::skip]
        assert_eq!(shifted.as_slice(), &[
            0.0, 0.0,
            1.0, 2.0,
            3.0, 4.0,
        ]);
        Ok(())
    }

    #[test]
    fn test_small_image_zero_border() -> Result<(), ImageError> {
        let image = ImageStack::from_shape_val([5, 5, 1], 1.0f64);
        let kernel = vec![1.0; KERNEL_SIZE];

        let filtered = zero_x(&image, &kernel)?;
        assert_eq!(filtered.shape(), &[5, 5, 1]);
        // every row sees all of its 5 samples
        assert!(filtered.as_slice().iter().all(|&v| v == 5.0));

        let filtered = zero_y(&image, &kernel)?;
        assert!(filtered.as_slice().iter().all(|&v| v == 5.0));
        Ok(())
    }

    #[test]
    fn test_small_image_replicate_border() -> Result<(), ImageError> {
        let image = ImageStack::new([1, 5, 1], vec![1.0f64, 2.0, 3.0, 4.0, 5.0])?;
        let kernel = vec![1.0; KERNEL_SIZE];

        let filtered = apply_kernel_x_with(
            &image,
            &kernel,
            BorderMode::Replicate,
            ExecutionStrategy::Serial,
        )?;

        // x = 0 reads 10 clamped copies of 1, then 1..=5, then 6 clamped copies of 5
        assert_eq!(filtered.as_slice()[0], 10.0 + 15.0 + 30.0);
        // x = 4 reads 6 clamped copies of 1, then 1..=5, then 10 clamped copies of 5
        assert_eq!(filtered.as_slice()[4], 6.0 + 15.0 + 50.0);
        Ok(())
    }

    #[test]
    fn test_small_image_valid_border() -> Result<(), ImageError> {
        let image = ImageStack::from_shape_val([5, 5, 1], 1.0f32);
        let filtered = apply_kernel_x_with(
            &image,
            &box_kernel(),
            BorderMode::Valid,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(filtered.shape(), &[5, 5, 1]);
        assert!(filtered.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn test_valid_border_interior() -> Result<(), ImageError> {
        let image = ImageStack::new([1, 23, 1], (1..=23).map(|v| v as f64).collect())?;
        let filtered = apply_kernel_x_with(
            &image,
            &identity_kernel(),
            BorderMode::Valid,
            ExecutionStrategy::Serial,
        )?;

        let expected = (1..=23)
            .map(|v| if (11..=13).contains(&v) { v as f64 } else { 0.0 })
            .collect::<Vec<_>>();
        assert_eq!(filtered.as_slice(), expected.as_slice());
        Ok(())
    }

    #[test]
    fn test_channels_pass_through() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = ImageStack::new([1, 3, 2], vec![
            1.0f32, 10.0,
            2.0, 20.0,
            3.0, 30.0,
        ])?;

        let filtered = zero_x(&image, &shifted_kernel(-1))?;

        #[rustfmt::skip]
        assert_eq!(filtered.as_slice(), &[
            0.0, 0.0,
            1.0, 10.0,
            2.0, 20.0,
        ]);
        Ok(())
    }

    #[test]
    fn test_batch_images_are_independent() -> Result<(), ImageError> {
        // two 2x1 images stacked along a leading axis
        let image = ImageStack::new([2, 2, 1, 1], vec![1.0f32, 2.0, 3.0, 4.0])?;
        let filtered = zero_y(&image, &shifted_kernel(1))?;

        assert_eq!(filtered.shape(), &[2, 2, 1, 1]);
        assert_eq!(filtered.as_slice(), &[2.0, 0.0, 4.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_u8_rounds_and_saturates() -> Result<(), ImageError> {
        let image = ImageStack::new([1, 1, 1], vec![200u8])?;

        let mut kernel = identity_kernel();
        kernel[KERNEL_RADIUS] = 2.0;
        let filtered = zero_x(&image, &kernel)?;
        assert_eq!(filtered.as_slice(), &[255]);

        kernel[KERNEL_RADIUS] = 0.5026;
        let filtered = zero_y(&image, &kernel)?;
        assert_eq!(filtered.as_slice(), &[101]);
        Ok(())
    }

    #[test]
    fn test_empty_stack() -> Result<(), ImageError> {
        let image = ImageStack::<f32>::new([0, 4, 3], vec![])?;
        let filtered = apply_kernel_y(&image, &box_kernel())?;
        assert_eq!(filtered.shape(), &[0, 4, 3]);

        let image = ImageStack::<f32>::new([4, 0, 3], vec![])?;
        let filtered = apply_kernel_x(&image, &box_kernel())?;
        assert_eq!(filtered.shape(), &[4, 0, 3]);
        Ok(())
    }

    #[test]
    fn test_serial_matches_parallel() -> Result<(), ImageError> {
        let data = (0..40 * 30 * 3)
            .map(|i| ((i * 7919) % 255) as f32 / 255.0)
            .collect::<Vec<_>>();
        let image = ImageStack::new([40, 30, 3], data)?;
        let kernel = box_kernel();

        for axis in [StencilAxis::X, StencilAxis::Y] {
            for border in [BorderMode::Zero, BorderMode::Replicate, BorderMode::Valid] {
                let serial: ImageStack<f32> =
                    apply_kernel(&image, &kernel, axis, border, ExecutionStrategy::Serial)?;
                let parallel: ImageStack<f32> =
                    apply_kernel(&image, &kernel, axis, border, ExecutionStrategy::Parallel)?;
                assert_eq!(serial, parallel);
            }
        }
        Ok(())
    }
}
