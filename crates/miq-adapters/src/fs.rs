//! Filesystem adapter for loading and tiling microscopy images.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use miq_core::{ImagePatches, PatchSource};
use tracing::{debug, warn};

/// Supported image extensions. Microscopy exports are PNG or TIFF.
const IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// Filesystem patch source adapter.
///
/// Walks the configured paths, decodes each image to grayscale, and tiles it
/// into non-overlapping square patches normalized to `[0, 1]`.
pub struct FsPatchSource {
    paths: Vec<PathBuf>,
    recursive: bool,
    patch_width: usize,
}

impl FsPatchSource {
    /// Creates a new filesystem patch source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    /// * `patch_width` - Side length of the extracted square patches
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool, patch_width: usize) -> Self {
        Self {
            paths,
            recursive,
            patch_width,
        }
    }

    /// Collects all image files from the configured paths.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl PatchSource for FsPatchSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImagePatches>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} image files", files.len());

        let patch_width = self.patch_width;
        Box::new(files.into_iter().map(move |path| load_patches(&path, patch_width)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Checks whether a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Loads one image and tiles it into normalized grayscale patches.
///
/// Tiles are extracted row-major; partial tiles at the right and bottom edges
/// are discarded, matching the model's fixed patch geometry.
///
/// # Errors
///
/// Returns an error if `patch_width` is zero, if the image cannot be decoded,
/// or if the image is smaller than one patch in either dimension.
pub fn load_patches(path: &Path, patch_width: usize) -> Result<ImagePatches> {
    if patch_width == 0 {
        anyhow::bail!("patch width must be at least 1");
    }

    let img = image::open(path)
        .with_context(|| format!("failed to load image: {}", path.display()))?;

    let (width, height) = (img.width(), img.height());
    let (pixels, w) = to_normalized_grayscale(&img);
    let h = pixels.len() / w;

    let cols = w / patch_width;
    let rows = h / patch_width;
    if cols == 0 || rows == 0 {
        anyhow::bail!(
            "image {} ({w}x{h}) is smaller than the patch width {patch_width}",
            path.display()
        );
    }

    let mut patches = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let mut patch = Vec::with_capacity(patch_width * patch_width);
            let y0 = row * patch_width;
            let x0 = col * patch_width;
            for y in y0..y0 + patch_width {
                let start = y * w + x0;
                patch.extend_from_slice(&pixels[start..start + patch_width]);
            }
            patches.push(patch);
        }
    }

    ImagePatches::new(path.display().to_string(), width, height, patch_width, patches)
}

/// Converts an image to a row-major grayscale buffer in `[0, 1]`.
///
/// 16-bit sources (the common case for microscopy TIFFs) are normalized by
/// the full 16-bit range rather than being truncated to 8 bits first.
fn to_normalized_grayscale(img: &DynamicImage) -> (Vec<f32>, usize) {
    match img {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            let gray = img.to_luma16();
            let width = gray.width() as usize;
            let pixels = gray
                .pixels()
                .map(|p| f32::from(p[0]) / f32::from(u16::MAX))
                .collect();
            (pixels, width)
        }
        _ => {
            let gray = img.to_luma8();
            let width = gray.width() as usize;
            let pixels = gray
                .pixels()
                .map(|p| f32::from(p[0]) / f32::from(u8::MAX))
                .collect();
            (pixels, width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("b.TIF")));
        assert!(is_supported_image(Path::new("c.tiff")));
        assert!(!is_supported_image(Path::new("d.jpg")));
        assert!(!is_supported_image(Path::new("e")));
    }

    #[test]
    fn test_grayscale_normalization_u8() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            2,
            1,
            image::Luma([255u8]),
        ));
        let (pixels, width) = to_normalized_grayscale(&img);
        assert_eq!(width, 2);
        assert!(pixels.iter().all(|&p| (p - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_grayscale_normalization_u16() {
        let img = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(
            1,
            2,
            image::Luma([u16::MAX / 2]),
        ));
        let (pixels, width) = to_normalized_grayscale(&img);
        assert_eq!(width, 1);
        assert!(pixels.iter().all(|&p| (p - 0.5).abs() < 1e-4));
    }
}
