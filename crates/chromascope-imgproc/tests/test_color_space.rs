use chromascope_image::{DataType, Image, ImageArray, ImageError, ImageSize};
use chromascope_imgproc::{
    color::{
        classify_color_space, convert_color_space, ClassifierConfig, ColorSpace, ConvertError,
        SpaceClassifier, SpaceLabel,
    },
    enhance::{modify_channel, modify_channel_array, ChannelOp, DEFAULT_FACTOR},
    metrics::mse,
    normalize::ensure_u8_3c,
};

fn gradient(height: usize, width: usize) -> Result<ImageArray, ImageError> {
    // blue ramp over red ramp, green fixed: bright enough to rule out 8-bit hue
    let data = (0..height)
        .flat_map(|y| {
            (0..width).flat_map(move |x| {
                let b = (x * 255 / width.max(1)) as u8;
                let r = (y * 255 / height.max(1)) as u8;
                [b.max(190), 40, r]
            })
        })
        .collect::<Vec<_>>();
    ImageArray::from_shape_vec(&[height, width, 3], data)
}

#[test]
fn classify_then_convert_round_trip() -> Result<(), ConvertError> {
    let bgr = gradient(8, 16)?;

    let report = classify_color_space(Some(&bgr));
    assert_eq!(report.space, SpaceLabel::Bgr);
    assert_eq!(report.dtype, Some(DataType::U8));
    assert_eq!(report.shape, Some(vec![8, 16, 3]));

    let gray = convert_color_space(&bgr, ColorSpace::Gray)?;
    assert_eq!(gray.shape(), &[8, 16]);
    assert_eq!(classify_color_space(Some(&gray)).space, SpaceLabel::Gray);

    let back = convert_color_space(&gray, ColorSpace::Bgr)?;
    assert_eq!(back.shape(), &[8, 16, 3]);
    assert_eq!(back.dtype(), DataType::U8);

    Ok(())
}

#[test]
fn float_input_is_normalized_before_editing() -> Result<(), ImageError> {
    let data = (0..4 * 4 * 3).map(|i| i as f32 / 47.0).collect::<Vec<_>>();
    let array = ImageArray::from_shape_vec(&[4, 4, 3], data)?;

    let image = ensure_u8_3c(&array)?;
    assert_eq!(image.as_slice()[0], 0);
    assert_eq!(image.as_slice()[47], 255);

    let channels = image.split_channels()?;
    assert_eq!(channels.len(), 3);

    let inverted = modify_channel(&channels[1], ChannelOp::Invert, DEFAULT_FACTOR)?;
    let restored = modify_channel(&inverted, ChannelOp::Invert, DEFAULT_FACTOR)?;
    assert_eq!(mse(&restored, &channels[1])?, 0.0);

    let brighter = modify_channel(&channels[1], ChannelOp::Brightness, DEFAULT_FACTOR)?;
    assert!(mse(&brighter, &channels[1])? > 0.0);

    Ok(())
}

#[test]
fn channel_array_keeps_shape() -> Result<(), ImageError> {
    let array = ImageArray::from_elem(&[3, 7], 120u8);

    let out = modify_channel_array(&array, ChannelOp::Contrast, DEFAULT_FACTOR)?;

    assert_eq!(out.shape(), array.shape());
    assert_eq!(out, array);

    Ok(())
}

#[test]
fn custom_thresholds() -> Result<(), ConvertError> {
    // every channel within the 8-bit hue range
    let image = ImageArray::from_elem(&[2, 2, 3], 170u8);
    assert_eq!(classify_color_space(Some(&image)).space, SpaceLabel::Hsv);

    let classifier = SpaceClassifier::new(ClassifierConfig {
        hsv_u8_hue_max: 160.0,
        ..Default::default()
    });
    let report = classifier.classify(Some(&image));
    assert_ne!(report.space, SpaceLabel::Hsv);

    let image = Image::<u8, 3>::from_size_val(
        ImageSize {
            width: 2,
            height: 2,
        },
        170,
    )?.into_array()?;
    let bgr = convert_color_space(&image, ColorSpace::Bgr)?;
    assert_eq!(bgr.shape(), &[2, 2, 3]);

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn report_serializes() -> Result<(), Box<dyn std::error::Error>> {
    let image = gradient(2, 2)?;
    let report = classify_color_space(Some(&image));

    let json = serde_json::to_string(&report)?;
    let parsed: chromascope_imgproc::color::SpaceReport = serde_json::from_str(&json)?;
    assert_eq!(parsed.space, report.space);
    assert_eq!(parsed.shape, report.shape);

    let config: ClassifierConfig = serde_json::from_str(r#"{ "round_trip": false }"#)?;
    assert!(!config.round_trip);
    assert_eq!(config.u8_max, ClassifierConfig::default().u8_max);

    Ok(())
}
