//! Miq Core - Focus-quality model, scoring, and inference engine
//!
//! This crate contains the domain types, the Miq convolutional model, the
//! ranked-probability-score loss, and the inference engine for scoring
//! microscopy image patches by focus quality.

pub mod domain;
pub mod inference;
pub mod model;
pub mod ports;
pub mod scoring;

pub use domain::{CertaintySummary, ImageDimensions, ImagePatches, ImagePrediction, PatchPrediction};
pub use inference::{best_device, Predictor};
pub use model::{MiqConfig, MiqNet, ModelVariant};
pub use ports::{PatchSource, ProgressEvent, ProgressSink, ResultOutput};
pub use scoring::{distribution_loss, ranked_probability_score, Objective};
