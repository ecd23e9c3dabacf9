use std::fmt;

use chromascope_image::{DataType, Image, ImageArray, ImageError, ValueRange};

use crate::color::{bgr_from_lab, bgr_from_ycrcb, lab_from_bgr, ycrcb_from_bgr};
use crate::metrics::mse;
use crate::normalize::{ensure_u8_3c, UNIT_SCALE_MAX};

/// Color space guessed for an image array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpaceLabel {
    /// Single channel intensity image.
    Gray,
    /// Hue, saturation, value.
    Hsv,
    /// Stable under a Lab or a YCrCb round trip. The two are not told apart.
    LabOrYCrCb,
    /// Three additive color channels, in either B, G, R or R, G, B order.
    Bgr,
    /// Nothing matched.
    #[default]
    Unknown,
}

impl SpaceLabel {
    /// Short display name of the label.
    pub fn name(&self) -> &'static str {
        match self {
            SpaceLabel::Gray => "GRAY",
            SpaceLabel::Hsv => "HSV",
            SpaceLabel::LabOrYCrCb => "Lab/YCrCb",
            SpaceLabel::Bgr => "BGR/RGB",
            SpaceLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SpaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean squared errors of the Lab and YCrCb round trips.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundTripErrors {
    /// Error after YCrCb -> BGR -> YCrCb.
    pub ycrcb_mse: f64,
    /// Error after Lab -> BGR -> Lab.
    pub lab_mse: f64,
}

impl RoundTripErrors {
    /// The smaller of the two errors.
    pub fn min(&self) -> f64 {
        self.ycrcb_mse.min(self.lab_mse)
    }
}

/// Outcome of the Lab/YCrCb round trip test.
#[derive(Debug)]
pub enum RoundTrip {
    /// Both round trips ran.
    Measured(RoundTripErrors),
    /// The image could not be normalized or converted; the test says nothing.
    Inconclusive(ImageError),
}

impl RoundTrip {
    /// Run both round trips on the 8-bit version of `image`.
    ///
    /// The image is assumed to be YCrCb (resp. Lab) encoded, converted to BGR and back, and
    /// compared against the normalized input.
    pub fn measure(image: &ImageArray) -> Self {
        match Self::try_measure(image) {
            Ok(errors) => RoundTrip::Measured(errors),
            Err(err) => RoundTrip::Inconclusive(err),
        }
    }

    fn try_measure(image: &ImageArray) -> Result<RoundTripErrors, ImageError> {
        let src = ensure_u8_3c(image)?;
        Ok(RoundTripErrors {
            ycrcb_mse: round_trip_mse(&src, bgr_from_ycrcb::<u8>, ycrcb_from_bgr::<u8>)?,
            lab_mse: round_trip_mse(&src, bgr_from_lab::<u8>, lab_from_bgr::<u8>)?,
        })
    }
}

type ConvertFn = fn(&Image<u8, 3>, &mut Image<u8, 3>) -> Result<(), ImageError>;

fn round_trip_mse(
    src: &Image<u8, 3>,
    to_bgr: ConvertFn,
    from_bgr: ConvertFn,
) -> Result<f64, ImageError> {
    let mut bgr = Image::from_size_val(src.size(), 0u8)?;
    to_bgr(src, &mut bgr)?;
    let mut back = Image::from_size_val(src.size(), 0u8)?;
    from_bgr(&bgr, &mut back)?;
    mse(&back, src)
}

/// Result of classifying an image array.
///
/// Fields other than `space` are filled in as far as classification got: a missing image leaves
/// all of them empty, a structurally unsupported array only records `dtype` and `shape`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpaceReport {
    /// The guessed color space.
    pub space: SpaceLabel,
    /// Data type of the input.
    pub dtype: Option<DataType>,
    /// Shape of the input.
    pub shape: Option<Vec<usize>>,
    /// One range for grayscale input, one per channel for 3-channel input.
    pub ranges: Option<Vec<ValueRange>>,
    /// Present only when the Lab/YCrCb round trip ran.
    pub round_trip: Option<RoundTripErrors>,
}

impl fmt::Display for SpaceReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.space)?;
        if let Some(dtype) = &self.dtype {
            write!(f, " dtype={dtype}")?;
        }
        if let Some(shape) = &self.shape {
            let dims = shape
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " shape=({dims})")?;
        }
        if let Some(ranges) = &self.ranges {
            for (i, range) in ranges.iter().enumerate() {
                write!(f, " C{i}=({:.2}, {:.2})", range.min, range.max)?;
            }
        }
        if let Some(errors) = &self.round_trip {
            write!(
                f,
                " YCrCb_mse={:.3} Lab_mse={:.3}",
                errors.ycrcb_mse, errors.lab_mse
            )?;
        }
        Ok(())
    }
}

/// Thresholds used by [`SpaceClassifier`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierConfig {
    /// Largest hue of an 8-bit HSV image. One above the nominal 179 to absorb rounding.
    pub hsv_u8_hue_max: f64,
    /// Largest value of an 8-bit channel.
    pub u8_max: f64,
    /// Largest hue of a float HSV image, in degrees.
    pub hsv_float_hue_max: f64,
    /// Largest saturation and value of a float HSV image.
    pub hsv_float_sv_max: f64,
    /// Largest value of a unit scale float image.
    pub unit_float_max: f64,
    /// Round trip errors strictly below this mark the image as Lab or YCrCb.
    pub round_trip_mse_max: f64,
    /// Whether to run the Lab/YCrCb round trip test at all.
    pub round_trip: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hsv_u8_hue_max: 180.0,
            u8_max: 255.0,
            hsv_float_hue_max: 360.0,
            hsv_float_sv_max: 1.1,
            unit_float_max: UNIT_SCALE_MAX,
            round_trip_mse_max: 0.5,
            round_trip: true,
        }
    }
}

/// What the rules get to look at.
struct Evidence<'a> {
    image: &'a ImageArray,
    dtype: DataType,
    maxima: [f64; 3],
}

type Rule = fn(&Evidence<'_>, &ClassifierConfig, &mut SpaceReport) -> bool;

/// Rules for 3-channel arrays, in precedence order. The first one to match wins.
const RULES: [(SpaceLabel, &str, Rule); 5] = [
    (SpaceLabel::Hsv, "hsv-u8", hsv_u8),
    (SpaceLabel::Hsv, "hsv-float", hsv_float),
    (SpaceLabel::LabOrYCrCb, "lab-ycrcb-round-trip", lab_ycrcb_round_trip),
    (SpaceLabel::Bgr, "bgr-u8", bgr_u8),
    (SpaceLabel::Bgr, "bgr-float", bgr_float),
];

fn hsv_u8(ev: &Evidence<'_>, config: &ClassifierConfig, _: &mut SpaceReport) -> bool {
    let [h, s, v] = ev.maxima;
    ev.dtype == DataType::U8
        && h <= config.hsv_u8_hue_max
        && s <= config.u8_max
        && v <= config.u8_max
}

fn hsv_float(ev: &Evidence<'_>, config: &ClassifierConfig, _: &mut SpaceReport) -> bool {
    let [h, s, v] = ev.maxima;
    ev.dtype.is_float()
        && h <= config.hsv_float_hue_max
        && s <= config.hsv_float_sv_max
        && v <= config.hsv_float_sv_max
}

fn lab_ycrcb_round_trip(
    ev: &Evidence<'_>,
    config: &ClassifierConfig,
    report: &mut SpaceReport,
) -> bool {
    if !config.round_trip {
        return false;
    }

    match RoundTrip::measure(ev.image) {
        RoundTrip::Measured(errors) => {
            log::debug!(
                "round trip errors: ycrcb={:.3} lab={:.3}",
                errors.ycrcb_mse,
                errors.lab_mse
            );
            report.round_trip = Some(errors);
            errors.min() < config.round_trip_mse_max
        }
        RoundTrip::Inconclusive(err) => {
            log::debug!("round trip test inconclusive: {err}");
            false
        }
    }
}

fn bgr_u8(ev: &Evidence<'_>, config: &ClassifierConfig, _: &mut SpaceReport) -> bool {
    ev.dtype == DataType::U8 && ev.maxima.iter().all(|&m| m <= config.u8_max)
}

fn bgr_float(ev: &Evidence<'_>, config: &ClassifierConfig, _: &mut SpaceReport) -> bool {
    ev.dtype.is_float() && ev.maxima.iter().all(|&m| m <= config.unit_float_max)
}

/// Guesses the color space of an image array from its shape, data type and value ranges.
///
/// The guess is ordered from the cheapest and most specific check to the least specific one:
///
/// 1. 2-D arrays are grayscale.
/// 2. Anything but (H, W, 3) is unknown.
/// 3. Per-channel ranges are recorded, then the first matching rule wins:
///    8-bit HSV, float HSV, Lab/YCrCb round trip, 8-bit BGR, unit scale float BGR.
/// 4. Otherwise the space is unknown.
///
/// Classification never fails; ambiguous input degrades to [`SpaceLabel::Unknown`].
#[derive(Clone, Debug, Default)]
pub struct SpaceClassifier {
    config: ClassifierConfig,
}

impl SpaceClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify an image array. `None` yields an empty unknown report.
    pub fn classify(&self, image: Option<&ImageArray>) -> SpaceReport {
        let Some(image) = image else {
            return SpaceReport::default();
        };

        let mut report = SpaceReport {
            dtype: Some(image.dtype()),
            shape: Some(image.shape().to_vec()),
            ..Default::default()
        };

        if image.ndim() == 2 {
            report.space = SpaceLabel::Gray;
            // empty or all-NaN arrays have no range
            report.ranges = image.value_range().map(|range| vec![range]);
            return report;
        }

        if !image.is_three_channel() {
            log::debug!("unsupported layout {:?}", image.shape());
            return report;
        }

        // empty or all-NaN channels have no range to reason about
        let Some(ranges) = (0..3)
            .map(|c| image.channel_range(c).ok().flatten())
            .collect::<Option<Vec<_>>>()
        else {
            return report;
        };

        let evidence = Evidence {
            image,
            dtype: image.dtype(),
            maxima: [ranges[0].max, ranges[1].max, ranges[2].max],
        };
        report.ranges = Some(ranges);

        for (label, name, rule) in RULES {
            if rule(&evidence, &self.config, &mut report) {
                log::debug!("classified as {label} by rule {name}");
                report.space = label;
                return report;
            }
        }

        report
    }
}

/// Classify an image array with the default thresholds.
///
/// # Example
///
/// ```
/// use chromascope_image::ImageArray;
/// use chromascope_imgproc::color::{classify_color_space, SpaceLabel};
///
/// let gray = ImageArray::from_elem(&[8, 8], 42u8);
/// let report = classify_color_space(Some(&gray));
///
/// assert_eq!(report.space, SpaceLabel::Gray);
/// assert_eq!(report.to_string(), "GRAY dtype=uint8 shape=(8, 8) C0=(42.00, 42.00)");
/// ```
pub fn classify_color_space(image: Option<&ImageArray>) -> SpaceReport {
    SpaceClassifier::default().classify(image)
}
