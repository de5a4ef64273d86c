//! Decoding uploads into RGB pixel lists.

use image::{ImageFormat, RgbImage, imageops::FilterType};
use log::debug;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Decode JPEG, PNG or AVIF bytes into an RGB image.
///
/// The format is sniffed from the content, not from a file name. Alpha is
/// dropped. AVIF needs the `avif` feature; without it such uploads fail
/// with [`Error::UnsupportedFormat`].
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    let format = image::guess_format(bytes)?;
    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Avif => {}
        other => return Err(Error::UnsupportedFormat(format!("{other:?}"))),
    }
    let img = image::load_from_memory_with_format(bytes, format)?;
    debug!("decoded {:?} image {}x{}", format, img.width(), img.height());
    Ok(img.to_rgb8())
}

/// Shrink an image larger than `side` in either dimension to exactly
/// `side × side`.
///
/// Nearest-neighbour sampling keeps every output pixel equal to some input
/// pixel, so no blended colors reach the clustering step. Smaller images are
/// returned unchanged.
pub fn downsample(img: RgbImage, side: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w <= side && h <= side {
        return img;
    }
    debug!("downsampling {w}x{h} to {side}x{side}");
    image::imageops::resize(&img, side, side, FilterType::Nearest)
}

/// Flatten an image into its pixels, row-major.
pub fn pixels(img: &RgbImage) -> Vec<Rgb> {
    img.pixels().map(|&px| Rgb::from(px)).collect()
}

/// Decode, optionally downsample and flatten in one step.
pub fn load_pixels(bytes: &[u8], resize: Option<u32>) -> Result<Vec<Rgb>> {
    let mut img = decode(bytes)?;
    if let Some(side) = resize {
        img = downsample(img, side);
    }
    let px = pixels(&img);
    if px.is_empty() {
        return Err(Error::EmptyImage);
    }
    Ok(px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer};
    use std::io::Cursor;

    fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_png() {
        let img: RgbImage = ImageBuffer::from_fn(3, 2, |x, _| image::Rgb([x as u8 * 100, 0, 0]));
        let decoded = decode(&encode(&img, ImageFormat::Png)).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn rejects_other_formats() {
        let img: RgbImage = ImageBuffer::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        let err = decode(&encode(&img, ImageFormat::Bmp)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn small_images_are_not_resized() {
        let img: RgbImage = ImageBuffer::from_pixel(10, 20, image::Rgb([9, 9, 9]));
        assert_eq!(downsample(img, 150).dimensions(), (10, 20));
    }

    #[test]
    fn large_images_become_square_without_new_colors() {
        let img: RgbImage = ImageBuffer::from_fn(400, 200, |x, _| {
            if x < 200 { image::Rgb([255, 0, 0]) } else { image::Rgb([0, 0, 255]) }
        });
        let small = downsample(img, 150);
        assert_eq!(small.dimensions(), (150, 150));
        assert!(small.pixels().all(|p| p.0 == [255, 0, 0] || p.0 == [0, 0, 255]));
    }

    #[test]
    fn flattens_row_major() {
        let img: RgbImage = ImageBuffer::from_fn(2, 2, |x, y| image::Rgb([x as u8, y as u8, 0]));
        assert_eq!(
            pixels(&img),
            vec![Rgb::new(0, 0, 0), Rgb::new(1, 0, 0), Rgb::new(0, 1, 0), Rgb::new(1, 1, 0)]
        );
    }
}
