use std::{fmt, str::FromStr};

use chromascope_image::{Image, ImageArray, ImageDtype, ImageError};

use crate::parallel;

/// Factor used when the caller does not pick one.
pub const DEFAULT_FACTOR: f32 = 1.5;

/// Per-channel adjustment applied by [`modify_channel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelOp {
    /// Scale every sample by the factor.
    Brightness,
    /// Stretch samples away from the channel mean by the factor.
    Contrast,
    /// Mirror samples around the middle of the 8-bit range.
    Invert,
}

impl ChannelOp {
    /// Lowercase name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            ChannelOp::Brightness => "brightness",
            ChannelOp::Contrast => "contrast",
            ChannelOp::Invert => "invert",
        }
    }
}

impl fmt::Display for ChannelOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelOp {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brightness" => Ok(ChannelOp::Brightness),
            "contrast" => Ok(ChannelOp::Contrast),
            "invert" => Ok(ChannelOp::Invert),
            _ => Err(ImageError::UnknownChannelOp(s.to_string())),
        }
    }
}

/// Adjust a single channel and return it as an 8-bit image.
///
/// The samples are read as `f32` and transformed as follows:
///
/// * [`ChannelOp::Brightness`]: `clamp(x * factor, 0, 255)`
/// * [`ChannelOp::Contrast`]: `clamp((x - mean) * factor + mean, 0, 255)`
/// * [`ChannelOp::Invert`]: `255 - x`, the factor is ignored.
///
/// The result is cast to `u8` by truncation, saturating at 0 and 255.
///
/// # Arguments
///
/// * `src` - The input channel.
/// * `op` - The adjustment to apply.
/// * `factor` - The scale factor, see [`DEFAULT_FACTOR`].
///
/// # Example
///
/// ```
/// use chromascope_image::{Image, ImageSize};
/// use chromascope_imgproc::enhance::{modify_channel, ChannelOp};
///
/// let channel = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![100, 200],
/// )
/// .unwrap();
///
/// let brighter = modify_channel(&channel, ChannelOp::Brightness, 2.0).unwrap();
/// assert_eq!(brighter.as_slice(), &[200, 255]);
/// ```
pub fn modify_channel<T: ImageDtype>(
    src: &Image<T, 1>,
    op: ChannelOp,
    factor: f32,
) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    match op {
        ChannelOp::Brightness => {
            parallel::par_iter_rows_val(src, &mut dst, |&x, y| {
                *y = quantize((x.as_f64() as f32 * factor).clamp(0.0, 255.0));
            });
        }
        ChannelOp::Contrast => {
            let mean = channel_mean(src) as f32;
            parallel::par_iter_rows_val(src, &mut dst, |&x, y| {
                let v = (x.as_f64() as f32 - mean) * factor + mean;
                *y = quantize(v.clamp(0.0, 255.0));
            });
        }
        ChannelOp::Invert => {
            parallel::par_iter_rows_val(src, &mut dst, |&x, y| {
                *y = quantize(255.0 - x.as_f64() as f32);
            });
        }
    }

    Ok(dst)
}

/// Same as [`modify_channel`] for a dynamically typed 2-D array.
///
/// # Errors
///
/// Returns [`ImageError::InvalidShape`] unless the array is 2-D.
pub fn modify_channel_array(
    src: &ImageArray,
    op: ChannelOp,
    factor: f32,
) -> Result<ImageArray, ImageError> {
    if src.ndim() != 2 {
        return Err(ImageError::InvalidShape(src.shape().to_vec()));
    }

    let out = match src {
        ImageArray::U8(_) => modify_channel(&Image::<u8, 1>::try_from_array(src)?, op, factor)?,
        ImageArray::F32(_) => modify_channel(&Image::<f32, 1>::try_from_array(src)?, op, factor)?,
        ImageArray::F64(_) => modify_channel(&Image::<f64, 1>::try_from_array(src)?, op, factor)?,
    };

    out.into_array()
}

fn channel_mean<T: ImageDtype>(src: &Image<T, 1>) -> f64 {
    if src.numel() == 0 {
        return 0.0;
    }
    let sum = src.as_slice().iter().map(|v| v.as_f64()).sum::<f64>();
    sum / src.numel() as f64
}

// truncates toward zero, NaN maps to 0
fn quantize(v: f32) -> u8 {
    v as u8
}
