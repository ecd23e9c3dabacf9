use crate::color::{unit, ColorDepth};
use crate::parallel;
use chromascope_image::{Image, ImageError};

// sRGB (D65) to XYZ, rows are X, Y, Z and columns R, G, B
const XYZ_FROM_RGB: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

const RGB_FROM_XYZ: [[f32; 3]; 3] = [
    [3.240479, -1.53715, -0.498535],
    [-0.969256, 1.875991, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

// D65 reference white
const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;

const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;
const F_SLOPE: f32 = 7.787;
const F_OFFSET: f32 = 16.0 / 116.0;

fn srgb_to_linear(x: f32) -> f32 {
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.0031308 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        F_SLOPE * t + F_OFFSET
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let t = f * f * f;
    if t > EPSILON {
        t
    } else {
        (f - F_OFFSET) / F_SLOPE
    }
}

/// Convert a BGR image to the CIE L\*a\*b\* color space.
///
/// The input is assumed to be sRGB with a D65 white point, channels in the order B, G, R and
/// values in `[0, T::MAX]`.
///
/// # Returns
///
/// The Lab image with the following channels:
///
/// * L: lightness, [0, 100] for floats and scaled by 255 / 100 for `u8`.
/// * a: green-red axis, unscaled for floats and offset by 128 for `u8`.
/// * b: blue-yellow axis, unscaled for floats and offset by 128 for `u8`.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use chromascope_image::{Image, ImageSize};
/// use chromascope_imgproc::color::lab_from_bgr;
///
/// let image = Image::<f32, 3>::from_size_val(ImageSize { width: 2, height: 2 }, 1.0).unwrap();
/// let mut lab = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();
///
/// lab_from_bgr(&image, &mut lab).unwrap();
///
/// assert!((lab.as_slice()[0] - 100.0).abs() < 1e-2);
/// ```
pub fn lab_from_bgr<T: ColorDepth>(
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
        let rgb = [
            srgb_to_linear(unit(src_pixel[2])),
            srgb_to_linear(unit(src_pixel[1])),
            srgb_to_linear(unit(src_pixel[0])),
        ];
        let [x, y, z] = XYZ_FROM_RGB.map(|row| row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);

        let fx = lab_f(x / WHITE_X);
        let fy = lab_f(y);
        let fz = lab_f(z / WHITE_Z);

        let l = if y > EPSILON {
            116.0 * fy - 16.0
        } else {
            KAPPA * y
        };
        let a = 500.0 * (fx - fy);
        let b = 200.0 * (fy - fz);

        dst_pixel[0] = T::from_f32(l * T::LAB_L_SCALE);
        dst_pixel[1] = T::from_f32(a + T::LAB_AB_OFFSET);
        dst_pixel[2] = T::from_f32(b + T::LAB_AB_OFFSET);
    });

    Ok(())
}

/// Convert a CIE L\*a\*b\* image to BGR.
///
/// The channel encoding of the input is the one produced by [`lab_from_bgr`]. Out of gamut colors
/// are clipped to the valid range.
///
/// Precondition: the input and output images must have the same size.
pub fn bgr_from_lab<T: ColorDepth>(
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
        let l = src_pixel[0].as_f64() as f32 / T::LAB_L_SCALE;
        let a = src_pixel[1].as_f64() as f32 - T::LAB_AB_OFFSET;
        let b = src_pixel[2].as_f64() as f32 - T::LAB_AB_OFFSET;

        let (y, fy) = if l <= KAPPA * EPSILON {
            let y = l / KAPPA;
            (y, F_SLOPE * y + F_OFFSET)
        } else {
            let fy = (l + 16.0) / 116.0;
            (fy * fy * fy, fy)
        };
        let x = lab_f_inv(a / 500.0 + fy) * WHITE_X;
        let z = lab_f_inv(fy - b / 200.0) * WHITE_Z;

        let [r, g, b] = RGB_FROM_XYZ
            .map(|row| linear_to_srgb((row[0] * x + row[1] * y + row[2] * z).clamp(0.0, 1.0)));

        dst_pixel[0] = T::from_f32(b * T::MAX);
        dst_pixel[1] = T::from_f32(g * T::MAX);
        dst_pixel[2] = T::from_f32(r * T::MAX);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use chromascope_image::{Image, ImageError, ImageSize};

    #[test]
    fn lab_from_bgr_f32() -> Result<(), ImageError> {
        // white, black, pure red
        let image = Image::<f32, 3>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        )?;

        let mut lab = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        super::lab_from_bgr(&image, &mut lab)?;

        let expected = [100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 53.24, 80.09, 67.20];
        for (a, b) in lab.as_slice().iter().zip(expected.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 0.1);
        }

        Ok(())
    }

    #[test]
    fn lab_from_bgr_u8_encoding() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![255, 255, 255, 0, 0, 0],
        )?;

        let mut lab = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::lab_from_bgr(&image, &mut lab)?;

        assert_eq!(lab.as_slice(), &[255, 128, 128, 0, 128, 128]);

        Ok(())
    }

    #[test]
    fn lab_round_trip_f32() -> Result<(), ImageError> {
        let data = (0..9 * 3)
            .map(|i| ((i * 29 + 7) % 101) as f32 / 100.0)
            .collect::<Vec<_>>();
        let image = Image::<f32, 3>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            data,
        )?;

        let mut lab = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        super::lab_from_bgr(&image, &mut lab)?;
        let mut back = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        super::bgr_from_lab(&lab, &mut back)?;

        for (a, b) in image.as_slice().iter().zip(back.as_slice().iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn lab_round_trip_u8() -> Result<(), ImageError> {
        let data = (0..16 * 3)
            .map(|i| ((i * 53 + 19) % 256) as u8)
            .collect::<Vec<_>>();
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            data,
        )?;

        let mut lab = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::lab_from_bgr(&image, &mut lab)?;
        let mut back = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::bgr_from_lab(&lab, &mut back)?;

        for (a, b) in image.as_slice().iter().zip(back.as_slice().iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 8, "{a} vs {b}");
        }

        Ok(())
    }
}
