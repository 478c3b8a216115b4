use crate::stack::ImageSize;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the shape.
    #[error("Data length ({0}) does not match the stack shape ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the stack does not have the (..., H, W, C) layout.
    #[error("Invalid shape {0:?}: expected at least 3 dimensions with a non-empty channel axis last")]
    InvalidShape(Vec<usize>),

    /// Error when the kernel does not have the required number of taps.
    #[error("Invalid kernel length {0}, expected {1}")]
    InvalidKernelLength(usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a region does not fit inside the image.
    #[error("Region at (y: {0}, x: {1}) with size {2} does not fit in an image of size {3}")]
    RegionOutOfBounds(usize, usize, ImageSize, ImageSize),

    /// Error when a tile has a zero dimension.
    #[error("Invalid tile size {0}")]
    InvalidTileSize(ImageSize),

    /// Error when a kernel parameter is not usable.
    #[error("Invalid sigma {0}, must be finite and positive")]
    InvalidSigma(f64),

    /// Error when an operation needs a single (H, W, C) image.
    #[error("Expected a single image, got a batch of {0}")]
    ExpectedSingleImage(usize),
}
