//! Synthetic patch builders and weight fixtures.

use std::path::Path;

use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use miq_core::{ImagePatches, MiqConfig, MiqNet};

/// Builder for synthetic single-image patch batches.
///
/// The patterns are proxies for focus conditions: checkerboards have the hard
/// edges of an in-focus field, uniform patches the flatness of a defocused
/// one. Scores are meaningless under random weights; these exist to exercise
/// shapes and plumbing.
pub struct SyntheticPatchBuilder;

impl SyntheticPatchBuilder {
    /// A single checkerboard patch (alternating 0/1 pixels).
    #[must_use]
    pub fn checkerboard(path: &str, patch_width: usize) -> ImagePatches {
        let patch = (0..patch_width * patch_width)
            .map(|i| {
                let (x, y) = (i % patch_width, i / patch_width);
                if (x + y) % 2 == 0 {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        Self::single(path, patch_width, patch)
    }

    /// A single uniform patch of the given intensity.
    #[must_use]
    pub fn uniform(path: &str, patch_width: usize, value: f32) -> ImagePatches {
        Self::single(path, patch_width, vec![value; patch_width * patch_width])
    }

    /// A single horizontal-gradient patch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn gradient(path: &str, patch_width: usize) -> ImagePatches {
        let patch = (0..patch_width * patch_width)
            .map(|i| (i % patch_width) as f32 / (patch_width.max(2) - 1) as f32)
            .collect();
        Self::single(path, patch_width, patch)
    }

    /// A multi-patch batch of uniform tiles with distinct intensities.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn tiled(path: &str, patch_width: usize, count: usize) -> ImagePatches {
        let patches = (0..count)
            .map(|i| vec![i as f32 / count.max(1) as f32; patch_width * patch_width])
            .collect();
        let side = patch_width as u32;
        ImagePatches::new(path, side * count as u32, side, patch_width, patches)
            .unwrap_or_else(|e| panic!("synthetic batch invariant broken: {e}"))
    }

    fn single(path: &str, patch_width: usize, patch: Vec<f32>) -> ImagePatches {
        #[allow(clippy::cast_possible_truncation)]
        let side = patch_width as u32;
        ImagePatches::new(path, side, side, patch_width, vec![patch])
            .unwrap_or_else(|e| panic!("synthetic patch invariant broken: {e}"))
    }
}

/// Writes a randomly initialized Miq checkpoint to `path`.
///
/// The file is a valid safetensors checkpoint whose shapes match `config`,
/// usable anywhere a trained model is structurally required.
///
/// # Errors
///
/// Returns an error if model construction or the save fails.
pub fn write_random_weights(path: impl AsRef<Path>, config: &MiqConfig) -> Result<()> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let _net = MiqNet::new(vb, config)?;
    varmap.save(path.as_ref())?;
    Ok(())
}

/// Writes a checkpoint whose output layer always predicts `class`.
///
/// The final fully connected weights are zeroed and its bias is peaked at
/// `class`, so the logits are constant regardless of input. Earlier layers
/// stay randomly initialized. Useful where a test needs a known prediction
/// without a trained model.
///
/// # Errors
///
/// Returns an error if `class` is out of range or the save fails.
pub fn write_class_locked_weights(
    path: impl AsRef<Path>,
    config: &MiqConfig,
    class: usize,
) -> Result<()> {
    anyhow::ensure!(
        class < config.num_classes,
        "class {class} out of range for {} classes",
        config.num_classes
    );

    let mut varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let _net = MiqNet::new(vb, config)?;

    let weight = Tensor::zeros((config.num_classes, 1024), DType::F32, &Device::Cpu)?;
    let mut bias = vec![0.0f32; config.num_classes];
    bias[class] = 10.0;
    let bias = Tensor::from_vec(bias, config.num_classes, &Device::Cpu)?;
    varmap.set_one("fc4.weight", &weight)?;
    varmap.set_one("fc4.bias", &bias)?;

    varmap.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_alternates() {
        let image = SyntheticPatchBuilder::checkerboard("c", 4);
        let patch = &image.patches[0];
        assert_eq!(patch.len(), 16);
        assert!((patch[0] - 1.0).abs() < f32::EPSILON);
        assert!(patch[1].abs() < f32::EPSILON);
    }

    #[test]
    fn test_uniform_is_flat() {
        let image = SyntheticPatchBuilder::uniform("u", 4, 0.25);
        assert!(image.patches[0].iter().all(|&p| (p - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_tiled_count() {
        let image = SyntheticPatchBuilder::tiled("t", 4, 3);
        assert_eq!(image.len(), 3);
    }

    #[test]
    fn test_class_locked_weights_predict_the_locked_class() {
        let config = MiqConfig {
            num_classes: 5,
            patch_width: 12,
            variant: miq_core::ModelVariant::Standard,
        };
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("locked.safetensors");
        write_class_locked_weights(&path, &config, 3).expect("locked weights");

        let predictor =
            miq_core::Predictor::from_weights(&path, &config, &Device::Cpu).expect("load");
        for image in [
            SyntheticPatchBuilder::checkerboard("crisp.png", 12),
            SyntheticPatchBuilder::uniform("flat.png", 12, 0.5),
        ] {
            let prediction = predictor.predict_image(&image).expect("prediction");
            assert_eq!(prediction.predicted, 3);
        }
    }

    #[test]
    fn test_class_locked_weights_reject_out_of_range_class() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("locked.safetensors");
        assert!(write_class_locked_weights(&path, &MiqConfig::default(), 11).is_err());
    }
}
