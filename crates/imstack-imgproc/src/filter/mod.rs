//! Filter operations
//!
//! This module provides the 21-tap stencil appliers and the helpers built on them.

/// Filter kernels
pub mod kernels;

/// Composed filter operations
mod ops;
pub use ops::*;

/// Axis-aligned stencil operations
mod stencil;
pub use stencil::*;
