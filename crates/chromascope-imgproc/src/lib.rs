#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color space primitives, classification and conversion.
pub mod color;

/// per-channel adjustments.
pub mod enhance;

/// image processing metrics module.
pub mod metrics;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;
