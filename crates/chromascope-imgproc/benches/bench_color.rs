use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use chromascope_image::{Image, ImageArray};
use chromascope_imgproc::color::{
    classify_color_space, convert_color_space, gray_from_bgr, hsv_from_bgr, lab_from_bgr,
    ColorSpace, SpaceClassifier,
};

fn bgr_array(width: usize, height: usize) -> ImageArray {
    let mut rng = rand::rng();
    let data = (0..width * height * 3)
        .map(|_| rng.random::<u8>())
        .collect::<Vec<_>>();
    ImageArray::from_shape_vec(&[height, width, 3], data).unwrap()
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("Primitives");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image = Image::<u8, 3>::try_from_array(&bgr_array(*width, *height)).unwrap();
        let image_f32 = image.cast::<f32>().unwrap();

        let gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
        let out = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
        let out_f32 = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("gray_from_bgr_u8", &parameter_string),
            &(&image, &gray),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(gray_from_bgr(src, &mut dst)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("hsv_from_bgr_u8", &parameter_string),
            &(&image, &out),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(hsv_from_bgr(src, &mut dst)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("lab_from_bgr_u8", &parameter_string),
            &(&image, &out),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(lab_from_bgr(src, &mut dst)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("lab_from_bgr_f32", &parameter_string),
            &(&image_f32, &out_f32),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(lab_from_bgr(src, &mut dst)))
            },
        );
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classify");

    let no_round_trip = SpaceClassifier::new(chromascope_imgproc::color::ClassifierConfig {
        round_trip: false,
        ..Default::default()
    });

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let array = bgr_array(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("classify", &parameter_string),
            &array,
            |b, i| b.iter(|| black_box(classify_color_space(Some(i)))),
        );

        group.bench_with_input(
            BenchmarkId::new("classify_ranges_only", &parameter_string),
            &array,
            |b, i| b.iter(|| black_box(no_round_trip.classify(Some(i)))),
        );

        group.bench_with_input(
            BenchmarkId::new("convert_to_hsv", &parameter_string),
            &array,
            |b, i| b.iter(|| black_box(convert_color_space(i, ColorSpace::Hsv))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_primitives, bench_classify);
criterion_main!(benches);
