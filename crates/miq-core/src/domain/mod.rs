//! Core domain types for focus-quality scoring.

mod patches;
mod prediction;

pub use patches::ImagePatches;
pub use prediction::{CertaintySummary, ImageDimensions, ImagePrediction, PatchPrediction};
