//! Miq Adapters - External adapters for miq.
//!
//! This crate provides adapters for:
//! - Filesystem patch source (PNG/TIFF microscopy images)
//! - Weight file location conventions

pub mod fs;
pub mod weights;

pub use fs::FsPatchSource;
pub use weights::{default_weights_path, weights_dir};
