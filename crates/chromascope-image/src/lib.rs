#![deny(missing_docs)]
//! Image types for typed and dynamically shaped pixel arrays

/// dynamically typed n-dimensional arrays.
pub mod array;

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::array::{DataType, ImageArray, ValueRange};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
