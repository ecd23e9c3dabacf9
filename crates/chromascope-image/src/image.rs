use crate::array::{DataType, ImageArray};
use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use chromascope_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

/// Trait for image data types.
///
/// Links a scalar type to its [`DataType`] tag and to the matching variant of [`ImageArray`].
pub trait ImageDtype:
    Copy + Default + PartialOrd + num_traits::NumCast + Send + Sync + 'static
{
    /// The runtime tag of the data type.
    const DTYPE: DataType;

    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;

    /// Widen the value to f64.
    fn as_f64(self) -> f64;

    /// Wrap an owned array of this type into an [`ImageArray`].
    fn wrap_array(array: ndarray::ArrayD<Self>) -> ImageArray;

    /// Borrow the inner array when the [`ImageArray`] holds this type.
    fn unwrap_array(array: &ImageArray) -> Option<&ndarray::ArrayD<Self>>;
}

impl ImageDtype for u8 {
    const DTYPE: DataType = DataType::U8;

    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn wrap_array(array: ndarray::ArrayD<Self>) -> ImageArray {
        ImageArray::U8(array)
    }

    fn unwrap_array(array: &ImageArray) -> Option<&ndarray::ArrayD<Self>> {
        match array {
            ImageArray::U8(a) => Some(a),
            _ => None,
        }
    }
}

impl ImageDtype for f32 {
    const DTYPE: DataType = DataType::F32;

    fn from_f32(x: f32) -> Self {
        x
    }

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn wrap_array(array: ndarray::ArrayD<Self>) -> ImageArray {
        ImageArray::F32(array)
    }

    fn unwrap_array(array: &ImageArray) -> Option<&ndarray::ArrayD<Self>> {
        match array {
            ImageArray::F32(a) => Some(a),
            _ => None,
        }
    }
}

impl ImageDtype for f64 {
    const DTYPE: DataType = DataType::F64;

    fn from_f32(x: f32) -> Self {
        x as f64
    }

    fn as_f64(self) -> f64 {
        self
    }

    fn wrap_array(array: ndarray::ArrayD<Self>) -> ImageArray {
        ImageArray::F64(array)
    }

    fn unwrap_array(array: &ImageArray) -> Option<&ndarray::ArrayD<Self>> {
        match array {
            ImageArray::F64(a) => Some(a),
            _ => None,
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored densely in row-major order with shape (H, W, C), where H is the
/// height of the image, W the width and C the number of channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromascope_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromascope_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the total number of scalar samples in the image.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the pixel data as a flat slice in (H, W, C) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat slice in (H, W, C) order.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the sample at `[y, x, channel]`, or `None` when out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, ch] = index;
        if y >= self.height() || x >= self.width() || ch >= CHANNELS {
            return None;
        }
        self.data.get((y * self.width() + x) * CHANNELS + ch)
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let channel_data = self
            .data
            .chunks_exact(CHANNELS)
            .map(|pixel| pixel[channel])
            .collect();

        Image::new(self.size, channel_data)
    }

    /// Split the image into its channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromascope_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 2>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   },
    ///   0.0f32).unwrap();
    ///
    /// let channels = image.split_channels().unwrap();
    /// assert_eq!(channels.len(), 2);
    /// ```
    pub fn split_channels(&self) -> Result<Vec<Image<T, 1>>, ImageError>
    where
        T: Copy,
    {
        (0..CHANNELS).map(|i| self.channel(i)).collect()
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If a value cannot be represented in the target type, an error is returned.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                <U as num_traits::NumCast>::from(x)
                    .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().into()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }
}

impl<T: ImageDtype, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Build a typed image from a dynamic array.
    ///
    /// A 1-channel image accepts either a 2-D array (H, W) or a 3-D array (H, W, 1). Any other
    /// channel count requires a 3-D array with a trailing dimension equal to `CHANNELS`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::CastError`] when the array holds a different data type and
    /// [`ImageError::InvalidShape`] when its shape does not match.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromascope_image::{Image, ImageArray};
    ///
    /// let array = ImageArray::from_shape_vec(&[2, 1, 3], vec![0u8, 1, 2, 3, 4, 5]).unwrap();
    /// let image = Image::<u8, 3>::try_from_array(&array).unwrap();
    ///
    /// assert_eq!(image.get([1, 0, 2]), Some(&5u8));
    /// ```
    pub fn try_from_array(array: &ImageArray) -> Result<Self, ImageError> {
        let inner = T::unwrap_array(array).ok_or_else(|| {
            ImageError::CastError(format!("{} from {}", T::DTYPE, array.dtype()))
        })?;

        let shape = inner.shape();
        let size = match *shape {
            [height, width] if CHANNELS == 1 => ImageSize { width, height },
            [height, width, channels] if channels == CHANNELS => ImageSize { width, height },
            _ => return Err(ImageError::InvalidShape(shape.to_vec())),
        };

        Image::new(size, inner.iter().copied().collect())
    }

    /// Convert the image into a dynamic array.
    ///
    /// Single channel images become 2-D arrays (H, W), the rest (H, W, C).
    pub fn into_array(self) -> Result<ImageArray, ImageError> {
        let shape = if CHANNELS == 1 {
            vec![self.height(), self.width()]
        } else {
            vec![self.height(), self.width(), CHANNELS]
        };
        ImageArray::from_shape_vec(&shape, self.data)
    }
}
