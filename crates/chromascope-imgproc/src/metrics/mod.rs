//! Image similarity metrics.
//!
//! - **MSE** (Mean Squared Error): Average squared difference between samples

mod mse;

pub use mse::mse;
