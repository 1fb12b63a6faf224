//! Patch batches extracted from a single microscopy image.

/// A batch of grayscale patches tiled from one image.
///
/// Patches are square, row-major, normalized to `[0, 1]`, and ordered
/// left-to-right, top-to-bottom across the source image. Partial tiles at the
/// right and bottom edges are discarded during extraction.
#[derive(Debug, Clone)]
pub struct ImagePatches {
    /// Path (or synthetic identifier) of the source image.
    pub path: String,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Side length of each square patch in pixels.
    pub patch_width: usize,
    /// Normalized pixel data, one `patch_width * patch_width` buffer per patch.
    pub patches: Vec<Vec<f32>>,
}

impl ImagePatches {
    /// Creates a patch batch, validating that every buffer matches the patch size.
    ///
    /// # Errors
    ///
    /// Returns an error if any patch buffer length differs from
    /// `patch_width * patch_width`.
    pub fn new(
        path: impl Into<String>,
        width: u32,
        height: u32,
        patch_width: usize,
        patches: Vec<Vec<f32>>,
    ) -> anyhow::Result<Self> {
        let expected = patch_width * patch_width;
        for (i, patch) in patches.iter().enumerate() {
            if patch.len() != expected {
                anyhow::bail!(
                    "patch {i} has {} pixels, expected {expected} for patch width {patch_width}",
                    patch.len()
                );
            }
        }
        Ok(Self {
            path: path.into(),
            width,
            height,
            patch_width,
            patches,
        })
    }

    /// Number of patches in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns true if the batch holds no patches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_matching_buffers() {
        let patches = ImagePatches::new("a.png", 4, 2, 2, vec![vec![0.0; 4], vec![1.0; 4]])
            .expect("valid patches");
        assert_eq!(patches.len(), 2);
        assert!(!patches.is_empty());
    }

    #[test]
    fn test_new_rejects_wrong_buffer_size() {
        let result = ImagePatches::new("a.png", 4, 2, 2, vec![vec![0.0; 3]]);
        assert!(result.is_err());
    }
}
