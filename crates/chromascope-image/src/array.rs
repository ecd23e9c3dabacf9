use ndarray::{ArrayD, Axis, IxDyn};

use crate::error::ImageError;
use crate::image::ImageDtype;

/// Runtime tag for the element type of an [`ImageArray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// 8-bit unsigned integer samples.
    U8,
    /// 32-bit floating point samples.
    F32,
    /// 64-bit floating point samples.
    F64,
}

impl DataType {
    /// Whether the data type is a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// The conventional lowercase name of the data type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::U8 => "uint8",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed interval of values observed in an array or in one of its channels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl ValueRange {
    // NaN samples are skipped so that `min <= max` always holds.
    fn of<'a, T: ImageDtype>(values: impl IntoIterator<Item = &'a T>) -> Option<Self> {
        values
            .into_iter()
            .map(|&v| v.as_f64())
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<ValueRange>, v| match acc {
                None => Some(ValueRange { min: v, max: v }),
                Some(r) => Some(ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }
}

/// A dynamically shaped, dynamically typed numeric array.
///
/// This is the boundary type for arrays whose layout is only known at runtime: a 2-D array is a
/// single channel image (H, W), a 3-D array carries its channels in the trailing dimension.
///
/// # Examples
///
/// ```
/// use chromascope_image::{DataType, ImageArray};
///
/// let array = ImageArray::from_shape_vec(&[2, 2], vec![0.0f32, 0.5, 0.25, 1.0]).unwrap();
///
/// assert_eq!(array.dtype(), DataType::F32);
/// assert_eq!(array.shape(), &[2, 2]);
/// assert_eq!(array.value_range().unwrap().max, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ImageArray {
    /// Array of 8-bit unsigned integers.
    U8(ArrayD<u8>),
    /// Array of 32-bit floats.
    F32(ArrayD<f32>),
    /// Array of 64-bit floats.
    F64(ArrayD<f64>),
}

/// Run the same expression over whichever array the enum holds.
macro_rules! with_array {
    ($value:expr, $array:ident => $body:expr) => {
        match $value {
            ImageArray::U8($array) => $body,
            ImageArray::F32($array) => $body,
            ImageArray::F64($array) => $body,
        }
    };
}

impl ImageArray {
    /// Create an array from a shape and row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length does not match the shape.
    pub fn from_shape_vec<T: ImageDtype>(shape: &[usize], data: Vec<T>) -> Result<Self, ImageError> {
        let array = ArrayD::from_shape_vec(IxDyn(shape), data)?;
        Ok(T::wrap_array(array))
    }

    /// Create an array of the given shape filled with `val`.
    pub fn from_elem<T: ImageDtype>(shape: &[usize], val: T) -> Self {
        T::wrap_array(ArrayD::from_elem(IxDyn(shape), val))
    }

    /// The element type of the array.
    pub fn dtype(&self) -> DataType {
        match self {
            ImageArray::U8(_) => DataType::U8,
            ImageArray::F32(_) => DataType::F32,
            ImageArray::F64(_) => DataType::F64,
        }
    }

    /// The shape of the array.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// The number of dimensions of the array.
    pub fn ndim(&self) -> usize {
        with_array!(self, a => a.ndim())
    }

    /// Whether the array is laid out as a 3-channel image (H, W, 3).
    pub fn is_three_channel(&self) -> bool {
        matches!(self.shape(), [_, _, 3])
    }

    /// Range of all values in the array, ignoring NaN. `None` when there are no values.
    pub fn value_range(&self) -> Option<ValueRange> {
        with_array!(self, a => ValueRange::of(a.iter()))
    }

    /// Range of the values of one channel of a 3-D array, ignoring NaN.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidShape`] if the array is not 3-D and
    /// [`ImageError::ChannelIndexOutOfBounds`] if the channel does not exist.
    pub fn channel_range(&self, channel: usize) -> Result<Option<ValueRange>, ImageError> {
        let shape = self.shape();
        if shape.len() != 3 {
            return Err(ImageError::InvalidShape(shape.to_vec()));
        }
        if channel >= shape[2] {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, shape[2]));
        }
        Ok(with_array!(self, a => ValueRange::of(a.index_axis(Axis(2), channel).iter())))
    }

    /// The largest finite value in the array, if any.
    pub fn max_finite(&self) -> Option<f64> {
        with_array!(self, a => a
            .iter()
            .map(|&v| v.as_f64())
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v)))))
    }
}

impl From<ArrayD<u8>> for ImageArray {
    fn from(array: ArrayD<u8>) -> Self {
        ImageArray::U8(array)
    }
}

impl From<ArrayD<f32>> for ImageArray {
    fn from(array: ArrayD<f32>) -> Self {
        ImageArray::F32(array)
    }
}

impl From<ArrayD<f64>> for ImageArray {
    fn from(array: ArrayD<f64>) -> Self {
        ImageArray::F64(array)
    }
}
