use crate::color::{unit, ColorDepth};
use crate::parallel;
use chromascope_image::{Image, ImageError};

/// Convert a BGR image to an HSV image.
///
/// The input image is assumed to have 3 channels in the order B, G, R, in the range
/// `[0, T::MAX]`.
///
/// # Arguments
///
/// * `src` - The input BGR image assumed to have 3 channels.
/// * `dst` - The output HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 180) for `u8` (degrees / 2) and [0, 360) for floats.
/// * S: The saturation channel in the range [0, 255] for `u8` and [0, 1] for floats.
/// * V: The value channel in the range [0, 255] for `u8` and [0, 1] for floats.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use chromascope_image::{Image, ImageSize};
/// use chromascope_imgproc::color::hsv_from_bgr;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///        width: 1,
///        height: 1,
///     },
///     vec![0, 0, 255],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// hsv_from_bgr(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.as_slice(), &[0, 255, 255]);
/// ```
pub fn hsv_from_bgr<T: ColorDepth>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 3>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let b = unit(src_pixel[0]);
        let g = unit(src_pixel[1]);
        let r = unit(src_pixel[2]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            60.0 * (b - r) / delta + 120.0
        } else {
            60.0 * (r - g) / delta + 240.0
        };
        let h = if h < 0.0 { h + 360.0 } else { h };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        // rounding may land exactly on the upper hue bound, which wraps to 0
        let hue = T::from_f32(h * T::HUE_MAX / 360.0);
        dst_pixel[0] = if hue.as_f64() as f32 >= T::HUE_MAX {
            T::from_f32(0.0)
        } else {
            hue
        };
        dst_pixel[1] = T::from_f32(s * T::MAX);
        dst_pixel[2] = T::from_f32(max * T::MAX);
    });

    Ok(())
}

/// Convert an HSV image to a BGR image.
///
/// The channel encoding of the input is the one produced by [`hsv_from_bgr`].
///
/// Precondition: the input and output images must have the same size.
pub fn bgr_from_hsv<T: ColorDepth>(
    src: &Image<T, 3>,
    dst: &mut Image<T, 3>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // indices into [v, p, q, t] for (b, g, r) per hue sector
    const SECTORS: [[usize; 3]; 6] = [
        [1, 3, 0],
        [1, 0, 2],
        [3, 0, 1],
        [0, 2, 1],
        [0, 1, 3],
        [2, 1, 0],
    ];

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let h = src_pixel[0].as_f64() as f32 * 6.0 / T::HUE_MAX;
        let s = unit(src_pixel[1]);
        let v = unit(src_pixel[2]);

        let (b, g, r) = if s == 0.0 {
            (v, v, v)
        } else {
            let h = h.rem_euclid(6.0);
            let sector = (h.floor() as usize).min(5);
            let f = h - sector as f32;
            let tab = [v, v * (1.0 - s), v * (1.0 - s * f), v * (1.0 - s * (1.0 - f))];
            let idx = SECTORS[sector];
            (tab[idx[0]], tab[idx[1]], tab[idx[2]])
        };

        dst_pixel[0] = T::from_f32(b * T::MAX);
        dst_pixel[1] = T::from_f32(g * T::MAX);
        dst_pixel[2] = T::from_f32(r * T::MAX);
    });

    Ok(())
}
