use crate::color::{ColorDepth, LUMA_WEIGHTS};
use crate::parallel;
use chromascope_image::{Image, ImageError};

const CR_SCALE: f32 = 0.713;
const CB_SCALE: f32 = 0.564;

/// Convert a BGR image to YCrCb.
///
/// Computes, with channels in `[0, T::MAX]`:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
/// Cr = (R - Y) * 0.713 + delta
/// Cb = (B - Y) * 0.564 + delta
///
/// where delta is 128 for `u8` and 0.5 for floats. The output channel order is Y, Cr, Cb.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use chromascope_image::{Image, ImageSize};
/// use chromascope_imgproc::color::ycrcb_from_bgr;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 2, height: 1 }, 200).unwrap();
/// let mut ycrcb = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// ycrcb_from_bgr(&image, &mut ycrcb).unwrap();
///
/// assert_eq!(ycrcb.as_slice(), &[200, 128, 128, 200, 128, 128]);
/// ```
pub fn ycrcb_from_bgr<T: ColorDepth>(
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

    let [bw, gw, rw] = LUMA_WEIGHTS;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let b = src_pixel[0].as_f64() as f32;
        let g = src_pixel[1].as_f64() as f32;
        let r = src_pixel[2].as_f64() as f32;

        let y = rw * r + gw * g + bw * b;
        let cr = (r - y) * CR_SCALE + T::CHROMA_DELTA;
        let cb = (b - y) * CB_SCALE + T::CHROMA_DELTA;

        dst_pixel[0] = T::from_f32(y);
        dst_pixel[1] = T::from_f32(cr);
        dst_pixel[2] = T::from_f32(cb);
    });

    Ok(())
}

/// Convert a YCrCb image to BGR.
///
/// Inverse of [`ycrcb_from_bgr`]:
///
/// R = Y + 1.403 * (Cr - delta)
/// G = Y - 0.714 * (Cr - delta) - 0.344 * (Cb - delta)
/// B = Y + 1.773 * (Cb - delta)
///
/// Precondition: the input and output images must have the same size.
pub fn bgr_from_ycrcb<T: ColorDepth>(
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
        let y = src_pixel[0].as_f64() as f32;
        let cr = src_pixel[1].as_f64() as f32 - T::CHROMA_DELTA;
        let cb = src_pixel[2].as_f64() as f32 - T::CHROMA_DELTA;

        dst_pixel[0] = T::from_f32(y + 1.773 * cb);
        dst_pixel[1] = T::from_f32(y - 0.714 * cr - 0.344 * cb);
        dst_pixel[2] = T::from_f32(y + 1.403 * cr);
    });

    Ok(())
}
