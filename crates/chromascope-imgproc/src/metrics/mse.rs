use chromascope_image::{Image, ImageDtype, ImageError};

/// Compute the mean squared error (MSE) between two images.
///
/// The MSE is defined as:
///
/// $ MSE = \frac{1}{n} \sum_{i=1}^{n} (I_1 - I_2)^2 $
///
/// where `I_1` and `I_2` are the two images and `n` is the number of samples. The sum is
/// accumulated in `f64`, so 8-bit inputs cannot overflow.
///
/// # Arguments
///
/// * `image1` - The first input image with shape (H, W, C).
/// * `image2` - The second input image with shape (H, W, C).
///
/// # Returns
///
/// The mean squared error between the two images, 0 for empty images.
///
/// # Example
///
/// ```
/// use chromascope_image::{Image, ImageSize};
/// use chromascope_imgproc::metrics::mse;
///
/// let image1 = Image::<u8, 1>::new(
///    ImageSize {
///      width: 2,
///      height: 1,
///    },
///    vec![0, 255],
/// )
/// .unwrap();
///
/// let image2 = Image::<u8, 1>::new(
///    ImageSize {
///      width: 2,
///      height: 1,
///    },
///    vec![255, 255],
/// )
/// .unwrap();
///
/// assert_eq!(mse(&image1, &image2).unwrap(), 255.0 * 255.0 / 2.0);
/// ```
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the two images have different sizes.
pub fn mse<T: ImageDtype, const C: usize>(
    image1: &Image<T, C>,
    image2: &Image<T, C>,
) -> Result<f64, ImageError> {
    if image1.size() != image2.size() {
        return Err(ImageError::InvalidImageSize(
            image1.cols(),
            image1.rows(),
            image2.cols(),
            image2.rows(),
        ));
    }

    if image1.numel() == 0 {
        return Ok(0.0);
    }

    let sum = image1
        .as_slice()
        .iter()
        .zip(image2.as_slice().iter())
        .map(|(&a, &b)| (a.as_f64() - b.as_f64()).powi(2))
        .sum::<f64>();

    Ok(sum / image1.numel() as f64)
}
