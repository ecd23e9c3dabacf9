#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use chromascope_image as image;

#[doc(inline)]
pub use chromascope_imgproc as imgproc;
