use std::fmt;

use chromascope_image::{Image, ImageArray, ImageError};

use crate::color::{
    bgr_from_gray, bgr_from_hsv, bgr_from_lab, gray_from_bgr, hsv_from_bgr, lab_from_bgr,
    ColorDepth, SpaceClassifier, SpaceLabel,
};

/// Color spaces that can be the endpoint of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    /// Three additive color channels in B, G, R order.
    Bgr,
    /// Hue, saturation, value.
    Hsv,
    /// CIE L\*a\*b\*.
    Lab,
    /// Single channel intensity.
    Gray,
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ColorSpace::Bgr => "BGR/RGB",
            ColorSpace::Hsv => "HSV",
            ColorSpace::Lab => "Lab",
            ColorSpace::Gray => "GRAY",
        })
    }
}

impl SpaceLabel {
    /// The conversion endpoint a classified image starts from, if any.
    ///
    /// Images that only proved stable under a Lab or YCrCb round trip have no endpoint: the two
    /// encodings cannot be told apart, and decoding one as the other yields wrong colors.
    pub fn as_color_space(&self) -> Option<ColorSpace> {
        match self {
            SpaceLabel::Gray => Some(ColorSpace::Gray),
            SpaceLabel::Hsv => Some(ColorSpace::Hsv),
            SpaceLabel::Bgr => Some(ColorSpace::Bgr),
            SpaceLabel::LabOrYCrCb | SpaceLabel::Unknown => None,
        }
    }
}

/// A single supported conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// BGR to HSV, see [`hsv_from_bgr`].
    BgrToHsv,
    /// BGR to Lab, see [`lab_from_bgr`].
    BgrToLab,
    /// BGR to grayscale, see [`gray_from_bgr`].
    BgrToGray,
    /// HSV to BGR, see [`bgr_from_hsv`].
    HsvToBgr,
    /// Lab to BGR, see [`bgr_from_lab`].
    LabToBgr,
    /// Grayscale to BGR, see [`bgr_from_gray`].
    GrayToBgr,
}

/// Every supported (source, destination) pair.
pub const CONVERSION_TABLE: [(ColorSpace, ColorSpace, Conversion); 6] = [
    (ColorSpace::Bgr, ColorSpace::Hsv, Conversion::BgrToHsv),
    (ColorSpace::Bgr, ColorSpace::Lab, Conversion::BgrToLab),
    (ColorSpace::Bgr, ColorSpace::Gray, Conversion::BgrToGray),
    (ColorSpace::Hsv, ColorSpace::Bgr, Conversion::HsvToBgr),
    (ColorSpace::Lab, ColorSpace::Bgr, Conversion::LabToBgr),
    (ColorSpace::Gray, ColorSpace::Bgr, Conversion::GrayToBgr),
];

/// List the supported (source, destination) pairs.
pub fn supported_conversions() -> impl Iterator<Item = (ColorSpace, ColorSpace)> {
    CONVERSION_TABLE.iter().map(|&(src, dst, _)| (src, dst))
}

impl Conversion {
    /// Find the conversion between two spaces.
    pub fn lookup(source: ColorSpace, destination: ColorSpace) -> Option<Self> {
        CONVERSION_TABLE
            .iter()
            .find(|(src, dst, _)| *src == source && *dst == destination)
            .map(|&(_, _, conversion)| conversion)
    }

    /// Apply the conversion to an array, keeping its data type.
    ///
    /// Conversions to grayscale return a 2-D array, all others an (H, W, 3) array.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidShape`] if the array does not have the layout expected by the
    /// source space.
    pub fn apply(&self, src: &ImageArray) -> Result<ImageArray, ImageError> {
        match src {
            ImageArray::U8(_) => self.apply_typed::<u8>(src),
            ImageArray::F32(_) => self.apply_typed::<f32>(src),
            ImageArray::F64(_) => self.apply_typed::<f64>(src),
        }
    }

    fn apply_typed<T: ColorDepth>(&self, src: &ImageArray) -> Result<ImageArray, ImageError> {
        match self {
            Conversion::BgrToHsv => convert_3c(src, hsv_from_bgr::<T>),
            Conversion::BgrToLab => convert_3c(src, lab_from_bgr::<T>),
            Conversion::HsvToBgr => convert_3c(src, bgr_from_hsv::<T>),
            Conversion::LabToBgr => convert_3c(src, bgr_from_lab::<T>),
            Conversion::BgrToGray => {
                let image = Image::<T, 3>::try_from_array(src)?;
                let mut gray = Image::<T, 1>::from_size_val(image.size(), T::default())?;
                gray_from_bgr(&image, &mut gray)?;
                gray.into_array()
            }
            Conversion::GrayToBgr => {
                let image = Image::<T, 1>::try_from_array(src)?;
                let mut bgr = Image::<T, 3>::from_size_val(image.size(), T::default())?;
                bgr_from_gray(&image, &mut bgr)?;
                bgr.into_array()
            }
        }
    }
}

fn convert_3c<T: ColorDepth>(
    src: &ImageArray,
    f: fn(&Image<T, 3>, &mut Image<T, 3>) -> Result<(), ImageError>,
) -> Result<ImageArray, ImageError> {
    let image = Image::<T, 3>::try_from_array(src)?;
    let mut dst = Image::<T, 3>::from_size_val(image.size(), T::default())?;
    f(&image, &mut dst)?;
    dst.into_array()
}

/// An error type for color space conversions.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// No conversion exists from the detected space to the requested one.
    #[error("Unsupported conversion: {detected} -> {requested}")]
    Unsupported {
        /// The space the image was classified as.
        detected: SpaceLabel,
        /// The space that was asked for.
        requested: ColorSpace,
    },

    /// The conversion itself failed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl SpaceClassifier {
    /// Classify `image` and convert it from the detected space to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Unsupported`] when the pair is not in [`CONVERSION_TABLE`],
    /// including when the source space is unknown or only known to be Lab or YCrCb.
    pub fn convert(
        &self,
        image: &ImageArray,
        destination: ColorSpace,
    ) -> Result<ImageArray, ConvertError> {
        let detected = self.classify(Some(image)).space;

        let conversion = detected
            .as_color_space()
            .and_then(|source| Conversion::lookup(source, destination))
            .ok_or(ConvertError::Unsupported {
                detected,
                requested: destination,
            })?;

        log::debug!("converting {detected} -> {destination} with {conversion:?}");

        Ok(conversion.apply(image)?)
    }
}

/// Convert an image from its detected color space to `destination`, using the default
/// classifier thresholds.
///
/// The input is never modified; the result is a new array of the same data type.
///
/// # Example
///
/// ```
/// use chromascope_image::ImageArray;
/// use chromascope_imgproc::color::{convert_color_space, ColorSpace};
///
/// // 8-bit, first channel above the 8-bit hue range: classified as BGR
/// let bgr = ImageArray::from_shape_vec(&[1, 2, 3], vec![255u8, 0, 0, 200, 10, 10]).unwrap();
///
/// let gray = convert_color_space(&bgr, ColorSpace::Gray).unwrap();
/// assert_eq!(gray.shape(), &[1, 2]);
/// ```
pub fn convert_color_space(
    image: &ImageArray,
    destination: ColorSpace,
) -> Result<ImageArray, ConvertError> {
    SpaceClassifier::default().convert(image, destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_six_pairs() {
        assert_eq!(supported_conversions().count(), 6);
        assert_eq!(
            Conversion::lookup(ColorSpace::Bgr, ColorSpace::Hsv),
            Some(Conversion::BgrToHsv)
        );
        assert_eq!(
            Conversion::lookup(ColorSpace::Lab, ColorSpace::Bgr),
            Some(Conversion::LabToBgr)
        );
        assert_eq!(Conversion::lookup(ColorSpace::Hsv, ColorSpace::Lab), None);
        assert_eq!(Conversion::lookup(ColorSpace::Gray, ColorSpace::Hsv), None);
    }

    #[test]
    fn bgr_to_hsv() -> Result<(), ConvertError> {
        let image = ImageArray::from_shape_vec(&[2, 2, 3], [255u8, 0, 0].repeat(4))?;
        let before = image.clone();

        let hsv = convert_color_space(&image, ColorSpace::Hsv)?;

        assert_eq!(hsv.shape(), &[2, 2, 3]);
        assert_eq!(hsv, ImageArray::from_shape_vec(&[2, 2, 3], [120u8, 255, 255].repeat(4))?);
        assert_eq!(image, before);

        Ok(())
    }

    #[test]
    fn bgr_to_gray_drops_channels() -> Result<(), ConvertError> {
        let image = ImageArray::from_shape_vec(&[3, 5, 3], [255u8, 0, 0].repeat(15))?;

        let gray = convert_color_space(&image, ColorSpace::Gray)?;

        assert_eq!(gray.shape(), &[3, 5]);
        assert_eq!(gray, ImageArray::from_elem(&[3, 5], 29u8));

        Ok(())
    }

    #[test]
    fn gray_to_bgr() -> Result<(), ConvertError> {
        let image = ImageArray::from_elem(&[4, 2], 0.25f32);

        let bgr = convert_color_space(&image, ColorSpace::Bgr)?;

        assert_eq!(bgr, ImageArray::from_elem(&[4, 2, 3], 0.25f32));

        Ok(())
    }

    #[test]
    fn hsv_to_lab_is_unsupported() {
        let image = ImageArray::from_elem(&[2, 2, 3], 100u8);

        let err = convert_color_space(&image, ColorSpace::Lab);

        match err {
            Err(ConvertError::Unsupported {
                detected,
                requested,
            }) => {
                assert_eq!(detected, SpaceLabel::Hsv);
                assert_eq!(requested, ColorSpace::Lab);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_source_is_unsupported() {
        let image = ImageArray::from_elem(&[2, 2, 4], 100u8);

        let err = convert_color_space(&image, ColorSpace::Bgr);

        assert!(matches!(
            err,
            Err(ConvertError::Unsupported {
                detected: SpaceLabel::Unknown,
                requested: ColorSpace::Bgr
            })
        ));
    }

    #[test]
    fn error_message_names_both_spaces() {
        let err = ConvertError::Unsupported {
            detected: SpaceLabel::Hsv,
            requested: ColorSpace::Lab,
        };
        assert_eq!(err.to_string(), "Unsupported conversion: HSV -> Lab");
    }

    #[test]
    fn unit_float_image_converts_from_hsv() -> Result<(), ConvertError> {
        let image = ImageArray::from_elem(&[100, 100, 3], 0.5f32);

        let bgr = convert_color_space(&image, ColorSpace::Bgr)?;
        assert_eq!(bgr.shape(), &[100, 100, 3]);
        assert_eq!(bgr.dtype(), image.dtype());

        assert!(matches!(
            convert_color_space(&image, ColorSpace::Hsv),
            Err(ConvertError::Unsupported { .. })
        ));

        Ok(())
    }

    #[test]
    fn round_trip_stable_image_is_unsupported() -> Result<(), ImageError> {
        // a YCrCb encoded row: decoding it as Lab would silently produce wrong colors
        let size = chromascope_image::ImageSize {
            width: 8,
            height: 1,
        };
        let bgr = Image::<u8, 3>::new(size, (0..8u8).flat_map(|i| [200 + i, 235, 250]).collect())?;
        let mut ycrcb = Image::<u8, 3>::from_size_val(size, 0)?;
        crate::color::ycrcb_from_bgr(&bgr, &mut ycrcb)?;
        let image = ycrcb.into_array()?;

        assert_eq!(
            crate::color::classify_color_space(Some(&image)).space,
            SpaceLabel::LabOrYCrCb
        );
        assert_eq!(SpaceLabel::LabOrYCrCb.as_color_space(), None);

        for destination in [ColorSpace::Bgr, ColorSpace::Hsv, ColorSpace::Lab, ColorSpace::Gray] {
            match convert_color_space(&image, destination) {
                Err(ConvertError::Unsupported {
                    detected,
                    requested,
                }) => {
                    assert_eq!(detected, SpaceLabel::LabOrYCrCb);
                    assert_eq!(requested, destination);
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        Ok(())
    }
}
