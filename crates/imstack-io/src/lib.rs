#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Writing image tiles to disk.
///
/// See [`chunk::chunk_image`].
pub mod chunk;

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and png encoding/decoding failures.
pub mod error;

/// PNG image encoding and decoding.
///
/// Read and write 8-bit PNG images as `(H, W, C)` stacks.
pub mod png;

/// Directory tree listing with file sizes.
pub mod tree;

pub use crate::chunk::chunk_image;
pub use crate::error::IoError;
pub use crate::tree::{list_files, write_file_tree};
