use imstack_image::ImageError;

/// Number of taps of every stencil kernel.
pub const KERNEL_SIZE: usize = 21;

/// Offset of the outermost tap from the center tap.
pub const KERNEL_RADIUS: usize = KERNEL_SIZE / 2;

/// Check that a kernel has exactly [`KERNEL_SIZE`] taps.
pub fn check_kernel(kernel: &[f64]) -> Result<(), ImageError> {
    if kernel.len() != KERNEL_SIZE {
        return Err(ImageError::InvalidKernelLength(kernel.len(), KERNEL_SIZE));
    }
    Ok(())
}

/// Create the identity kernel: one at the center tap, zero elsewhere.
pub fn identity_kernel() -> Vec<f64> {
    let mut kernel = vec![0.0; KERNEL_SIZE];
    kernel[KERNEL_RADIUS] = 1.0;
    kernel
}

/// Create a box blur kernel with uniform weights `1 / 21`.
pub fn box_kernel() -> Vec<f64> {
    vec![1.0 / KERNEL_SIZE as f64; KERNEL_SIZE]
}

fn check_sigma(sigma: f64) -> Result<(), ImageError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ImageError::InvalidSigma(sigma));
    }
    Ok(())
}

/// Create a gaussian kernel.
///
/// The weights are sampled at the integer offsets `-10..=10` and normalized to
/// sum to one.
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian, in pixels.
///
/// # Errors
///
/// Returns [`ImageError::InvalidSigma`] when `sigma` is not finite and positive.
pub fn gaussian_kernel(sigma: f64) -> Result<Vec<f64>, ImageError> {
    check_sigma(sigma)?;

    let sigma_sq = sigma * sigma;
    let mut kernel = (0..KERNEL_SIZE)
        .map(|i| {
            let x = i as f64 - KERNEL_RADIUS as f64;
            (-(x * x) / (2.0 * sigma_sq)).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    Ok(kernel)
}

/// Create a first-derivative-of-gaussian kernel.
///
/// `dg[i] = (x / sigma^2) * g[i]` with `x` the tap offset and `g` the normalized
/// gaussian. Applied with the stencil appliers, a ramp of slope `s` along the
/// filtered axis maps to `~s` away from the borders. The weights sum to ~0.
pub fn gaussian_derivative_kernel(sigma: f64) -> Result<Vec<f64>, ImageError> {
    let g = gaussian_kernel(sigma)?;
    let sigma_sq = sigma * sigma;
    Ok(g.iter()
        .enumerate()
        .map(|(i, &gi)| (i as f64 - KERNEL_RADIUS as f64) / sigma_sq * gi)
        .collect())
}
