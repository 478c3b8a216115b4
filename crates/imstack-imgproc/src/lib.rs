#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// tiling of images into fixed-size chunks.
pub mod chunk;

/// image region cropping module.
pub mod crop;

/// stencil filtering module.
pub mod filter;

/// module containing parallelization utilities.
pub mod parallel;
