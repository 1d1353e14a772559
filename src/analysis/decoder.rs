//! Image provider backed by the `image` crate.

use std::collections::BTreeSet;
use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::error::{Result, SlothError};

use super::{ColourMode, ImageInfo, ImageProvider, MAX_SAMPLED_COLOURS};

/// Decodes map files from disk.
///
/// Indexed images are expanded by the decoder, so a palette with a
/// transparent entry shows up as RGBA.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageProvider;

impl ImageProvider for FileImageProvider {
    fn inspect(&self, path: &Path) -> Result<ImageInfo> {
        let img = image::open(path).map_err(|e| SlothError::Image {
            path: path.to_path_buf(),
            message: format!("Failed to decode image: {}", e),
        })?;

        Ok(summarize(&img))
    }
}

fn colour_mode(color: ColorType) -> ColourMode {
    match color {
        ColorType::L8 | ColorType::L16 => ColourMode::Luma,
        ColorType::La8 | ColorType::La16 => ColourMode::LumaAlpha,
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColourMode::Rgb,
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColourMode::Rgba,
        other if other.has_alpha() => ColourMode::Rgba,
        _ => ColourMode::Rgb,
    }
}

/// Summarize a decoded image.
pub fn summarize(img: &DynamicImage) -> ImageInfo {
    let mode = colour_mode(img.color());
    let rgba = img.to_rgba8();

    let mut histogram = vec![0u32; 256];
    let mut colours = BTreeSet::new();
    let mut sums = [0u64; 3];

    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        histogram[a as usize] += 1;
        sums[0] += r as u64;
        sums[1] += g as u64;
        sums[2] += b as u64;

        if colours.len() < MAX_SAMPLED_COLOURS {
            colours.insert([r, g, b]);
        }
    }

    let count = (rgba.width() as u64 * rgba.height() as u64).max(1) as f64;
    let channel_means = sums.map(|s| s as f64 / count);

    let (alpha_extrema, alpha_histogram) = if mode.has_alpha() {
        let min = histogram.iter().position(|&c| c > 0);
        let max = histogram.iter().rposition(|&c| c > 0);
        let extrema = min.zip(max).map(|(lo, hi)| (lo as u8, hi as u8));
        (extrema, histogram)
    } else {
        (None, Vec::new())
    };

    ImageInfo {
        mode,
        alpha_extrema,
        alpha_histogram,
        colours: colours.into_iter().collect(),
        channel_means,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_inspect_rgba_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grate_d.png");

        let mut img = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        img.save(&path).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.mode, ColourMode::Rgba);
        assert_eq!(info.alpha_extrema, Some((0, 255)));
        assert!(info.has_meaningful_alpha());
        assert!(info.alpha_is_binary());
        assert!(!info.is_grayscale());
    }

    #[test]
    fn test_inspect_opaque_rgba_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wall_d.png");
        RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.alpha_extrema, Some((255, 255)));
        assert!(!info.has_meaningful_alpha());
    }

    #[test]
    fn test_inspect_gray_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lamp_a.png");
        GrayImage::from_pixel(2, 2, Luma([128])).save(&path).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.mode, ColourMode::Luma);
        assert!(info.alpha_histogram.is_empty());
        assert!(info.is_grayscale());
        assert_eq!(info.channel_means, [128.0, 128.0, 128.0]);
    }

    #[test]
    fn test_inspect_rgb_means() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lamp_a.png");
        let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 0, 255]));
        img.save(&path).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.mode, ColourMode::Rgb);
        assert_eq!(info.channel_means, [255.0, 0.0, 127.5]);
        assert_eq!(info.colours.len(), 2);
    }

    #[test]
    fn test_inspect_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken_d.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = FileImageProvider.inspect(&path).unwrap_err();
        assert!(matches!(err, SlothError::Image { .. }));
    }

    /// Encode a one-row, 8-bit indexed PNG with an optional tRNS chunk.
    fn indexed_png(palette: &[[u8; 3]], trns: &[u8], indices: &[u8]) -> Vec<u8> {
        fn crc32(bytes: &[u8]) -> u32 {
            let mut crc = 0xffff_ffffu32;
            for &byte in bytes {
                crc ^= byte as u32;
                for _ in 0..8 {
                    crc = if crc & 1 != 0 { (crc >> 1) ^ 0xedb8_8320 } else { crc >> 1 };
                }
            }
            !crc
        }

        fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            let mut body = kind.to_vec();
            body.extend_from_slice(data);
            out.extend_from_slice(&body);
            out.extend_from_slice(&crc32(&body).to_be_bytes());
        }

        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&(indices.len() as u32).to_be_bytes());
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&[8, 3, 0, 0, 0]);

        // Filter byte, then one stored deflate block inside a zlib stream
        let mut raw = vec![0u8];
        raw.extend_from_slice(indices);
        let (mut a, mut b) = (1u32, 0u32);
        for &byte in &raw {
            a = (a + byte as u32) % 65521;
            b = (b + a) % 65521;
        }
        let len = raw.len() as u16;
        let mut idat = vec![0x78, 0x01, 0x01];
        idat.extend_from_slice(&len.to_le_bytes());
        idat.extend_from_slice(&(!len).to_le_bytes());
        idat.extend_from_slice(&raw);
        idat.extend_from_slice(&((b << 16) | a).to_be_bytes());

        let mut png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        chunk(&mut png, b"IHDR", &ihdr);
        chunk(&mut png, b"PLTE", &palette.concat());
        if !trns.is_empty() {
            chunk(&mut png, b"tRNS", trns);
        }
        chunk(&mut png, b"IDAT", &idat);
        chunk(&mut png, b"IEND", &[]);
        png
    }

    #[test]
    fn test_inspect_indexed_png_with_transparent_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fence_d.png");
        std::fs::write(&path, indexed_png(&[[0, 0, 0], [90, 60, 30]], &[0], &[0, 1, 1, 0])).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.mode, ColourMode::Rgba);
        assert_eq!(info.alpha_extrema, Some((0, 255)));
        assert_eq!(info.alpha_histogram[0], 2);
        assert_eq!(info.alpha_histogram[255], 2);
        assert!(info.has_meaningful_alpha());
        assert!(info.alpha_is_binary());
    }

    #[test]
    fn test_inspect_indexed_png_without_transparency() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lamp_a.png");
        std::fs::write(&path, indexed_png(&[[64, 64, 64], [192, 192, 192]], &[], &[0, 1])).unwrap();

        let info = FileImageProvider.inspect(&path).unwrap();

        assert_eq!(info.mode, ColourMode::Rgb);
        assert_eq!(info.alpha_extrema, None);
        assert!(!info.has_meaningful_alpha());
        assert!(info.is_grayscale());
        assert_eq!(info.colours, vec![[64, 64, 64], [192, 192, 192]]);
    }
}
