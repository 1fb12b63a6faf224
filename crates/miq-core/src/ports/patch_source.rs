//! Patch source port for loading tiled images from various sources.

use crate::domain::ImagePatches;

/// Port for producing patch batches, one per source image.
pub trait PatchSource: Send + Sync {
    /// Returns an iterator over patch batches from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if an image fails to load or tile.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImagePatches>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
