#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the image module.
pub mod error;

/// Pixel-wise operations over image stacks.
pub mod ops;

/// Sample types that can be stored in an image stack.
pub mod sample;

/// n-dimensional image stack representation.
pub mod stack;

pub use crate::error::ImageError;
pub use crate::sample::Sample;
pub use crate::stack::{ImageSize, ImageStack, StackDims};
