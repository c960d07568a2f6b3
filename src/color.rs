//! Image colour profiling
//!
//! Downscales an image to a small square grid, averages every n-th pixel
//! and hands the mean to `thali_id_common::classify_rgb`.

use crate::error::{Result, ThaliError};
use crate::scanner::scan_folder;
use image::imageops::FilterType;
use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use thali_id_common::{ColorProfile, Rgb};

/// Colour profile of one image in a folder run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProfile {
    pub file_name: String,
    #[serde(flatten)]
    pub profile: ColorProfile,
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(ThaliError::FileNotFound(path.display().to_string()));
    }
    image::open(path).map_err(|e| ThaliError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Profile a decoded image
///
/// # Arguments
/// * `img` - decoded image
/// * `sample_size` - side of the grid the image is resized to
/// * `stride` - every `stride`-th pixel (row-major) is sampled
pub fn profile_image(img: &DynamicImage, sample_size: u32, stride: usize) -> ColorProfile {
    let size = sample_size.max(1);
    let grid = img.resize_exact(size, size, FilterType::Triangle).to_rgb8();

    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for pixel in grid.pixels().step_by(stride.max(1)) {
        r += u64::from(pixel[0]);
        g += u64::from(pixel[1]);
        b += u64::from(pixel[2]);
        count += 1;
    }

    let mean = |sum: u64| -> u8 {
        if count == 0 {
            0
        } else {
            (sum as f64 / count as f64).round().clamp(0.0, 255.0) as u8
        }
    };
    let rgb = Rgb {
        r: mean(r),
        g: mean(g),
        b: mean(b),
    };

    let profile = ColorProfile::from_rgb(rgb);
    tracing::debug!(r = rgb.r, g = rgb.g, b = rgb.b, bucket = %profile.dominant_bucket, samples = count, "colour profile");
    profile
}

pub fn profile_file(path: &Path, sample_size: u32, stride: usize) -> Result<ColorProfile> {
    let img = load_image(path)?;
    Ok(profile_image(&img, sample_size, stride))
}

/// Profile every image directly inside `folder`, in parallel.
/// Images that fail to decode are logged and skipped.
pub fn profile_folder(folder: &Path, sample_size: u32, stride: usize) -> Result<Vec<ImageProfile>> {
    let images = scan_folder(folder)?;
    if images.is_empty() {
        return Err(ThaliError::NoImagesFound(folder.display().to_string()));
    }

    let profiles = images
        .par_iter()
        .filter_map(|info| match profile_file(&info.path, sample_size, stride) {
            Ok(profile) => Some(ImageProfile {
                file_name: info.file_name.clone(),
                profile,
            }),
            Err(e) => {
                tracing::warn!(file = %info.file_name, error = %e, "skipping image");
                None
            }
        })
        .collect();

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as Pixel, RgbImage};
    use thali_id_common::ColorBucket;

    fn solid(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Pixel([r, g, b])))
    }

    #[test]
    fn test_solid_colours() {
        assert_eq!(profile_image(&solid(230, 180, 40), 100, 10).dominant_bucket, ColorBucket::Yellow);
        assert_eq!(profile_image(&solid(60, 140, 50), 100, 10).dominant_bucket, ColorBucket::Green);
        assert_eq!(profile_image(&solid(250, 250, 250), 100, 10).dominant_bucket, ColorBucket::White);
        assert_eq!(profile_image(&solid(20, 20, 20), 100, 10).dominant_bucket, ColorBucket::Black);
    }

    #[test]
    fn test_mean_is_exact_for_solid_image() {
        let profile = profile_image(&solid(140, 100, 30), 100, 10);
        assert_eq!(profile.rgb, Rgb { r: 140, g: 100, b: 30 });
        assert_eq!(profile.dominant_bucket, ColorBucket::Brown);
    }

    #[test]
    fn test_zero_stride_and_size_are_clamped() {
        let profile = profile_image(&solid(230, 180, 40), 0, 0);
        assert_eq!(profile.dominant_bucket, ColorBucket::Yellow);
    }

    #[test]
    fn test_missing_file() {
        let err = profile_file(Path::new("/nonexistent/thali.jpg"), 100, 10).unwrap_err();
        assert!(matches!(err, ThaliError::FileNotFound(_)));
    }
}
