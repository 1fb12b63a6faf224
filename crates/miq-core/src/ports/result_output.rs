//! Result output port for writing predictions.

use crate::domain::ImagePrediction;

/// Port for outputting image predictions.
pub trait ResultOutput: Send + Sync {
    /// Writes a single image prediction.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, prediction: &ImagePrediction) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
