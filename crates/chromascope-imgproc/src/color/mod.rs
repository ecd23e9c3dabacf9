//! Color space primitives and the heuristics built on top of them.
//!
//! The primitives follow the `x_from_y(src, dst)` convention and work on 3-channel images in
//! B, G, R order. Channel encodings depend on the sample type, see [`ColorDepth`].

mod classify;
mod convert;
mod gray;
mod hsv;
mod lab;
mod ycrcb;

pub use classify::{
    classify_color_space, ClassifierConfig, RoundTrip, RoundTripErrors, SpaceClassifier,
    SpaceLabel, SpaceReport,
};
pub use convert::{
    convert_color_space, supported_conversions, ColorSpace, Conversion, ConvertError,
    CONVERSION_TABLE,
};
pub use gray::{bgr_from_gray, gray_from_bgr};
pub use hsv::{bgr_from_hsv, hsv_from_bgr};
pub use lab::{bgr_from_lab, lab_from_bgr};
pub use ycrcb::{bgr_from_ycrcb, ycrcb_from_bgr};

use chromascope_image::ImageDtype;

/// Luma weights in B, G, R order.
pub(crate) const LUMA_WEIGHTS: [f32; 3] = [0.114, 0.587, 0.299];

/// Channel encoding of a sample type for the color primitives.
///
/// 8-bit images pack every space into `[0, 255]`, floating point images keep the natural range
/// of each channel.
pub trait ColorDepth: ImageDtype {
    /// Value of a fully saturated sample.
    const MAX: f32;
    /// Exclusive upper bound of the encoded hue.
    const HUE_MAX: f32;
    /// Offset added to the chroma channels of YCrCb.
    const CHROMA_DELTA: f32;
    /// Scale applied to the Lab lightness in [0, 100].
    const LAB_L_SCALE: f32;
    /// Offset added to the Lab a and b channels.
    const LAB_AB_OFFSET: f32;
}

impl ColorDepth for u8 {
    const MAX: f32 = 255.0;
    const HUE_MAX: f32 = 180.0;
    const CHROMA_DELTA: f32 = 128.0;
    const LAB_L_SCALE: f32 = 255.0 / 100.0;
    const LAB_AB_OFFSET: f32 = 128.0;
}

impl ColorDepth for f32 {
    const MAX: f32 = 1.0;
    const HUE_MAX: f32 = 360.0;
    const CHROMA_DELTA: f32 = 0.5;
    const LAB_L_SCALE: f32 = 1.0;
    const LAB_AB_OFFSET: f32 = 0.0;
}

impl ColorDepth for f64 {
    const MAX: f32 = 1.0;
    const HUE_MAX: f32 = 360.0;
    const CHROMA_DELTA: f32 = 0.5;
    const LAB_L_SCALE: f32 = 1.0;
    const LAB_AB_OFFSET: f32 = 0.0;
}

/// Sample scaled to [0, 1].
#[inline]
pub(crate) fn unit<T: ColorDepth>(v: T) -> f32 {
    v.as_f64() as f32 / T::MAX
}
