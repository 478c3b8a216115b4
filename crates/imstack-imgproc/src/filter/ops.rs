use imstack_image::{ImageError, ImageStack, Sample};

use super::{apply_kernel, kernels, BorderMode, StencilAxis};
use crate::parallel::ExecutionStrategy;

/// Apply a kernel along x, then a kernel along y.
///
/// The intermediate result is kept in `f64`, so integer stacks are rounded
/// once, on the final store. Every border mode maps indices per axis, so the
/// pass order only changes the result by floating-point rounding.
///
/// # Arguments
///
/// * `src` - The source stack with shape (..., H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `border` - The rule for neighbours outside the image, used for both passes.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
pub fn separable_filter<T: Sample>(
    src: &ImageStack<T>,
    kernel_x: &[f64],
    kernel_y: &[f64],
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<ImageStack<T>, ImageError> {
    kernels::check_kernel(kernel_x)?;
    kernels::check_kernel(kernel_y)?;

    let horizontal: ImageStack<f64> =
        apply_kernel(src, kernel_x, StencilAxis::X, border, strategy)?;
    apply_kernel(&horizontal, kernel_y, StencilAxis::Y, border, strategy)
}

/// Blur a stack with the 21-tap box kernel on both axes.
///
/// PRECONDITION: `src` has shape (..., H, W, C).
pub fn box_blur<T: Sample>(src: &ImageStack<T>) -> Result<ImageStack<T>, ImageError> {
    let kernel = kernels::box_kernel();
    separable_filter(
        src,
        &kernel,
        &kernel,
        BorderMode::default(),
        ExecutionStrategy::Auto,
    )
}

/// Blur a stack with a 21-tap gaussian kernel on both axes.
///
/// # Arguments
///
/// * `src` - The source stack with shape (..., H, W, C).
/// * `sigma` - The sigma of the gaussian kernel (sigma_x, sigma_y).
pub fn gaussian_blur<T: Sample>(
    src: &ImageStack<T>,
    sigma: (f64, f64),
) -> Result<ImageStack<T>, ImageError> {
    let kernel_x = kernels::gaussian_kernel(sigma.0)?;
    let kernel_y = kernels::gaussian_kernel(sigma.1)?;
    separable_filter(
        src,
        &kernel_x,
        &kernel_y,
        BorderMode::default(),
        ExecutionStrategy::Auto,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_separable_filter_impulse() -> Result<(), ImageError> {
        let mut image = ImageStack::from_shape_val([25, 25, 1], 0.0f64);
        if let Some(v) = image.get_mut(&[12, 12, 0]) {
            *v = 1.0;
        }

        let kernel = kernels::box_kernel();
        let blurred = separable_filter(
            &image,
            &kernel,
            &kernel,
            BorderMode::Zero,
            ExecutionStrategy::Serial,
        )?;

        // the impulse spreads over the 21x21 window around it
        let weight = 1.0 / (21.0 * 21.0);
        assert_relative_eq!(
            blurred.get(&[12, 12, 0]).copied().unwrap_or(0.0),
            weight,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            blurred.get(&[2, 22, 0]).copied().unwrap_or(0.0),
            weight,
            epsilon = 1e-15
        );
        assert_eq!(blurred.get(&[1, 12, 0]), Some(&0.0));
        assert_eq!(blurred.get(&[12, 23, 0]), Some(&0.0));
        assert_relative_eq!(blurred.as_slice().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_separable_filter_checks_both_kernels() {
        let image = ImageStack::from_shape_val([3, 3, 1], 0u8);
        let kernel = kernels::box_kernel();
        assert_eq!(
            separable_filter(
                &image,
                &kernel,
                &kernel[..5],
                BorderMode::Zero,
                ExecutionStrategy::Serial
            ),
            Err(ImageError::InvalidKernelLength(5, 21))
        );
    }

    #[test]
    fn test_separable_filter_u8_rounds_once() -> Result<(), ImageError> {
        let image = ImageStack::from_shape_val([1, 1, 1], 1u8);

        let mut kernel = vec![0.0; kernels::KERNEL_SIZE];
        kernel[kernels::KERNEL_RADIUS] = 0.7;

        // 1 * 0.7 * 0.7 = 0.49 rounds to 0, rounding the x pass first would give 1
        let filtered = separable_filter(
            &image,
            &kernel,
            &kernel,
            BorderMode::Zero,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(filtered.as_slice(), &[0]);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_constant_interior() -> Result<(), ImageError> {
        let image = ImageStack::from_shape_val([30, 30, 2], 0.5f32);
        let blurred = gaussian_blur(&image, (1.5, 3.0))?;

        assert_eq!(blurred.shape(), image.shape());
        let center = blurred.get(&[15, 15, 1]).copied().unwrap_or(0.0);
        assert_relative_eq!(center, 0.5, epsilon = 1e-6);

        // the corners have no full window
        assert_eq!(blurred.get(&[0, 0, 0]), Some(&0.0));
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_invalid_sigma() {
        let image = ImageStack::from_shape_val([3, 3, 1], 0.0f32);
        assert_eq!(
            gaussian_blur(&image, (1.0, 0.0)),
            Err(ImageError::InvalidSigma(0.0))
        );
    }

    #[test]
    fn test_box_blur_keeps_constant_interior() -> Result<(), ImageError> {
        let image = ImageStack::from_shape_val([21, 21, 1], 1.0f64);
        let blurred = box_blur(&image)?;
        assert_relative_eq!(
            blurred.get(&[10, 10, 0]).copied().unwrap_or(0.0),
            1.0,
            epsilon = 1e-12
        );
        Ok(())
    }
}
