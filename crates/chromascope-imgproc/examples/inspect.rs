use chromascope_image::ImageArray;
use chromascope_imgproc::color::{classify_color_space, convert_color_space, ColorSpace};
use chromascope_imgproc::enhance::{modify_channel, ChannelOp, DEFAULT_FACTOR};
use chromascope_imgproc::normalize::ensure_u8_3c;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows which rule matched
    env_logger::init();

    println!("=== Color space inspection demo ===\n");

    // 1. an 8-bit image whose first channel leaves the hue range
    let bgr = ImageArray::from_shape_vec(
        &[2, 2, 3],
        vec![
            255, 0, 0, // blue
            0, 255, 0, // green
            0, 0, 255, // red
            255, 255, 255, // white
        ],
    )?;
    println!("1. {}", classify_color_space(Some(&bgr)));

    // 2. the same image in HSV
    let hsv = convert_color_space(&bgr, ColorSpace::Hsv)?;
    println!("2. {}", classify_color_space(Some(&hsv)));

    // 3. a unit scale float image, quantized to 8 bits
    let unit = ImageArray::from_elem(&[2, 2, 3], 0.5f32);
    println!("3. {}", classify_color_space(Some(&unit)));
    let quantized = ensure_u8_3c(&unit)?;
    println!("   quantized: {:?}", quantized.as_slice());

    // 4. stretch the contrast of the green channel
    let green = ensure_u8_3c(&bgr)?.channel(1)?;
    let stretched = modify_channel(&green, ChannelOp::Contrast, DEFAULT_FACTOR)?;
    println!("4. contrast: {:?} -> {:?}", green.as_slice(), stretched.as_slice());

    // 5. conversions that are not in the table fail
    if let Err(err) = convert_color_space(&hsv, ColorSpace::Lab) {
        println!("5. {err}");
    }

    Ok(())
}
