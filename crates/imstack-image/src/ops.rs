use crate::{ImageStack, Sample};

/// Cast the samples of a stack to a different type after scaling them.
///
/// Each output sample is `U::from_f64(x * scale)`, so integer outputs are
/// rounded and saturated.
///
/// # Arguments
///
/// * `src` - The source stack.
/// * `scale` - The scale to multiply the samples with.
///
/// Example:
///
/// ```
/// use imstack_image::{ops::cast_and_scale, ImageStack};
///
/// let image = ImageStack::new([1, 2, 1], vec![0u8, 255]).unwrap();
/// let image_f32 = cast_and_scale::<u8, f32>(&image, 1. / 255.0);
///
/// assert_eq!(image_f32.as_slice(), &[0.0f32, 1.0]);
/// ```
pub fn cast_and_scale<T: Sample, U: Sample>(src: &ImageStack<T>, scale: f64) -> ImageStack<U> {
    src.map(|&x| U::from_f64(x.to_f64() * scale))
}

/// Convert a float stack in `[0, 1]` to `u8`.
///
/// Values are scaled by 255, rounded and saturated, so out-of-range values
/// produced by filtering clip to 0 or 255.
pub fn to_u8_scaled<T: Sample>(src: &ImageStack<T>) -> ImageStack<u8> {
    cast_and_scale(src, 255.0)
}
