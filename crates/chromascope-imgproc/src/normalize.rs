//! Coercion of arbitrary numeric 3-channel arrays into 8-bit images.
//!
//! Floating point images come in two common scales: unit scale, where samples live in [0, 1],
//! and byte scale, where they already live in [0, 255]. [`ensure_u8_3c`] guesses the scale from
//! the largest finite sample and maps both onto `u8`.
//!
//! # Example
//!
//! ```
//! use chromascope_image::ImageArray;
//! use chromascope_imgproc::normalize::ensure_u8_3c;
//!
//! let array = ImageArray::from_elem(&[2, 2, 3], 0.5f32);
//! let image = ensure_u8_3c(&array).unwrap();
//!
//! assert!(image.as_slice().iter().all(|&v| v == 128));
//! ```

use chromascope_image::{Image, ImageArray, ImageDtype, ImageError, ImageSize};

/// Largest sample value still considered unit scale.
pub const UNIT_SCALE_MAX: f64 = 1.0 + 1e-6;

/// Convert a 3-channel array of any data type into an 8-bit image.
///
/// * `u8` arrays are copied unchanged.
/// * Float arrays whose largest finite value is at most [`UNIT_SCALE_MAX`] are treated as unit
///   scale: `round(clamp(v, 0, 1) * 255)`.
/// * Other float arrays are treated as byte scale: `round(clamp(v, 0, 255))`.
///
/// NaN samples become 0. Arrays without any finite value are treated as unit scale.
///
/// The scale guess is a heuristic: a float image on an unusual scale whose maximum lies between
/// 1 and 255 is taken as byte scale.
///
/// # Errors
///
/// Returns [`ImageError::InvalidShape`] unless the array has shape (H, W, 3).
pub fn ensure_u8_3c(src: &ImageArray) -> Result<Image<u8, 3>, ImageError> {
    if !src.is_three_channel() {
        return Err(ImageError::InvalidShape(src.shape().to_vec()));
    }

    match src {
        ImageArray::U8(_) => Image::try_from_array(src),
        ImageArray::F32(a) => quantize(src.shape(), a.iter().copied(), src.max_finite()),
        ImageArray::F64(a) => quantize(src.shape(), a.iter().copied(), src.max_finite()),
    }
}

fn quantize<T: ImageDtype>(
    shape: &[usize],
    values: impl Iterator<Item = T>,
    max_finite: Option<f64>,
) -> Result<Image<u8, 3>, ImageError> {
    let unit_scale = max_finite.unwrap_or(0.0) <= UNIT_SCALE_MAX;

    let data = values
        .map(|v| {
            let v = v.as_f64();
            let scaled = if unit_scale {
                v.clamp(0.0, 1.0) * 255.0
            } else {
                v.clamp(0.0, 255.0)
            };
            // NaN saturates to 0
            scaled.round() as u8
        })
        .collect();

    Image::new(
        ImageSize {
            width: shape[1],
            height: shape[0],
        },
        data,
    )
}
