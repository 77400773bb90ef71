use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::cli::{CompressionLevel, OutputFormat};
use crate::error::SplitError;

pub const JPEG_QUALITY: u8 = 95;

/// Encode a sprite in `format` and write it to `path`.
///
/// `compress` only applies to PNG output.
pub fn save_sprite_image(
    image: &RgbaImage,
    path: &Path,
    format: OutputFormat,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let data = encode(image, format).map_err(|e| SplitError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_data = match (format, compress) {
        (OutputFormat::Png, Some(level)) => {
            let opts = match level {
                CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
                CompressionLevel::Max => oxipng::Options::max_compression(),
            };
            oxipng::optimize_from_memory(&data, &opts).map_err(|e| SplitError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        }
        _ => data,
    };

    fs::write(path, output_data).map_err(|e| SplitError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn encode(image: &RgbaImage, format: OutputFormat) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => image.write_to(&mut buffer, ImageFormat::Png)?,
        OutputFormat::Webp => image.write_to(&mut buffer, ImageFormat::WebP)?,
        OutputFormat::Jpg => {
            let flat = flatten_on_white(image);
            JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode_image(&flat)?;
        }
    }
    Ok(buffer.into_inner())
}

/// Composite onto opaque white, using alpha as the blend mask
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let alpha = u32::from(p[3]);
        let blend = |c: u8| {
            let v = (u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sprite() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_flatten_on_white() {
        let flat = flatten_on_white(&sprite());
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*flat.get_pixel(3, 0), Rgb([255, 255, 255]));

        let half = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_on_white(&half);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn test_save_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        save_sprite_image(&sprite(), &path, OutputFormat::Png, None).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.get_pixel(3, 3)[3], 0);
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_jpeg_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        save_sprite_image(&sprite(), &path, OutputFormat::Jpg, None).unwrap();

        let loaded = image::open(&path).unwrap();
        assert!(!loaded.color().has_alpha());
        let corner = loaded.into_rgb8();
        assert!(corner.get_pixel(3, 3).0.iter().all(|&c| c > 240));
    }

    #[test]
    fn test_save_compressed_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        save_sprite_image(
            &sprite(),
            &path,
            OutputFormat::Png,
            Some(CompressionLevel::Level(2)),
        )
        .unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.png");
        let err = save_sprite_image(&sprite(), &path, OutputFormat::Png, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::OutputWrite { .. })
        ));
    }
}
