//! Weight file location conventions.

use std::path::PathBuf;

use miq_core::ModelVariant;

/// Returns the conventional weights directory.
///
/// Uses `XDG_DATA_HOME/miq/models` or `~/.local/share/miq/models`.
#[must_use]
pub fn weights_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("miq")
        .join("models")
}

/// Returns the conventional weights path for a model variant.
///
/// Used when the CLI is invoked without an explicit `--weights` path; the
/// file must have been placed there by the user.
#[must_use]
pub fn default_weights_path(variant: ModelVariant) -> PathBuf {
    weights_dir().join(format!("miq_{}.safetensors", variant.name()))
}
