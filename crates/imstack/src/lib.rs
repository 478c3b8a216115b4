#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imstack_image as image;

#[doc(inline)]
pub use imstack_imgproc as imgproc;

#[doc(inline)]
pub use imstack_io as io;
