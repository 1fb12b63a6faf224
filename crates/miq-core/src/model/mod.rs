//! The Miq convolutional model.

mod net;
mod variant;

pub use net::{MiqConfig, MiqNet, DEFAULT_NUM_CLASSES, DEFAULT_PATCH_WIDTH};
pub use variant::ModelVariant;
