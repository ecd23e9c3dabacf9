/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the array shape does not describe the expected image layout.
    #[error("Array of shape={0:?} does not match the expected image layout")]
    InvalidShape(Vec<usize>),

    /// Error when the array shape cannot be built from the data.
    #[error("Invalid shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the sizes of two images do not match.
    #[error("Image size mismatch: ({0}, {1}) vs ({2}, {3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for an image with {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),

    /// Error when a channel operation name is not recognized.
    #[error("Unknown channel operation: {0}")]
    UnknownChannelOp(String),
}
