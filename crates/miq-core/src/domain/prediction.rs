//! Prediction result types.

use serde::{Deserialize, Serialize};

/// Focus-quality prediction for a whole image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePrediction {
    /// Path to the scored image.
    pub path: String,
    /// Timestamp of scoring (ISO 8601).
    pub timestamp: String,
    /// Source image dimensions.
    pub dimensions: ImageDimensions,
    /// Side length of the scored patches in pixels.
    pub patch_width: usize,
    /// Aggregate predicted quality class (0 = worst focus).
    pub predicted: usize,
    /// Certainty summary across patches.
    pub certainty: CertaintySummary,
    /// Per-patch predictions, in extraction order.
    pub patches: Vec<PatchPrediction>,
}

/// Focus-quality prediction for a single patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchPrediction {
    /// Softmax probability for each quality class, in rank order.
    pub probabilities: Vec<f32>,
    /// Predicted quality class (argmax of `probabilities`).
    pub predicted: usize,
    /// Normalized-entropy certainty in `[0, 1]`.
    ///
    /// 1 for a one-hot distribution, 0 for a uniform one.
    pub certainty: f32,
}

/// Certainty summary over all patches of one image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CertaintySummary {
    /// Mean per-patch certainty.
    pub mean: f32,
    /// Maximum per-patch certainty.
    pub max: f32,
    /// Certainty of the aggregate (certainty-weighted) distribution.
    pub aggregate: f32,
}

/// Source image dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates image dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
