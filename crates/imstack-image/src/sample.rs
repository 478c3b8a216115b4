/// Trait for the element types of an image stack.
///
/// Filters accumulate in `f64` and store back through [`Sample::from_f64`].
/// Float types are stored unchanged, integer types are rounded to the nearest
/// value and saturated to their range.
pub trait Sample: Copy + Send + Sync + num_traits::Zero + 'static {
    /// Convert the sample to the accumulation type.
    fn to_f64(self) -> f64;

    /// Convert an accumulated value back to the sample type.
    fn from_f64(val: f64) -> Self;
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val as f32
    }
}

impl Sample for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

impl Sample for u16 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val.round().clamp(0.0, u16::MAX as f64) as u16
    }
}
