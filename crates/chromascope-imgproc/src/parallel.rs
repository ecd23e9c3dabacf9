use rayon::prelude::*;

use chromascope_image::Image;

/// Apply a function to each pixel in the image in parallel.
///
/// Rows are distributed over the global rayon pool; inside a row the pixels are visited in order.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    // chunk sizes must be non-zero
    if src.cols() == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * src.cols())
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src.cols()))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each sample in the image in parallel with a value.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    if src.cols() == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C1 * src.cols())
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * src.cols()))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use chromascope_image::{Image, ImageError, ImageSize};

    #[test]
    fn par_iter_rows_swaps_channels() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2, 3, 4, 5, 6],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

        super::par_iter_rows(&src, &mut dst, |s, d| {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
        });

        assert_eq!(dst.as_slice(), &[3, 2, 1, 6, 5, 4]);

        Ok(())
    }

    #[test]
    fn par_iter_rows_val_empty_image() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new(
            ImageSize {
                width: 0,
                height: 3,
            },
            vec![],
        )?;
        let mut dst = Image::<u8, 1>::new(src.size(), vec![])?;

        super::par_iter_rows_val(&src, &mut dst, |_, d| *d = 1);

        assert!(dst.as_slice().is_empty());

        Ok(())
    }
}
