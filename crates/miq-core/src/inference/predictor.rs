//! Patch-batch prediction and per-image aggregation.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{Device, Tensor, D};
use candle_nn::{ops::softmax, ModuleT};

use super::utils::{argmax, certainty};
use super::{best_device, load_safetensors};
use crate::domain::{CertaintySummary, ImageDimensions, ImagePatches, ImagePrediction, PatchPrediction};
use crate::model::{MiqConfig, MiqNet};

/// Scores patch batches with a loaded Miq network.
pub struct Predictor {
    net: MiqNet,
    device: Device,
}

impl Predictor {
    /// Creates a predictor from an already-built network.
    ///
    /// `device` must be the device the network's weights live on.
    #[must_use]
    pub const fn new(net: MiqNet, device: Device) -> Self {
        Self { net, device }
    }

    /// Loads weights from a safetensors file and builds a predictor on the
    /// given device.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights cannot be loaded or do not match the
    /// configuration.
    pub fn from_weights(
        path: impl AsRef<Path>,
        config: &MiqConfig,
        device: &Device,
    ) -> Result<Self> {
        let vb = load_safetensors(path, device)?;
        let net = MiqNet::new(vb, config)?;
        Ok(Self::new(net, device.clone()))
    }

    /// Loads weights onto the best available device.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights cannot be loaded or do not match the
    /// configuration.
    pub fn from_weights_auto(path: impl AsRef<Path>, config: &MiqConfig) -> Result<Self> {
        let device = best_device();
        Self::from_weights(path, config, &device)
    }

    /// The model configuration in use.
    #[must_use]
    pub const fn config(&self) -> &MiqConfig {
        self.net.config()
    }

    /// Scores a tensor of patches `[batch, 1, patch_width, patch_width]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward pass fails.
    pub fn predict_batch(&self, patches: &Tensor) -> Result<Vec<PatchPrediction>> {
        let logits = self
            .net
            .forward_t(patches, false)
            .context("forward pass failed")?;
        let probabilities = softmax(&logits, D::Minus1)?
            .to_vec2::<f32>()
            .context("failed to read probabilities")?;

        Ok(probabilities
            .into_iter()
            .map(|row| {
                let predicted = argmax(&row);
                let certainty = certainty(&row);
                PatchPrediction {
                    probabilities: row,
                    predicted,
                    certainty,
                }
            })
            .collect())
    }

    /// Scores all patches of one image and aggregates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, if the patch width disagrees
    /// with the model configuration, or if inference fails.
    pub fn predict_image(&self, image: &ImagePatches) -> Result<ImagePrediction> {
        let config = self.net.config();
        if image.is_empty() {
            anyhow::bail!("no patches extracted from {}", image.path);
        }
        if image.patch_width != config.patch_width {
            anyhow::bail!(
                "patch width {} does not match model patch width {}",
                image.patch_width,
                config.patch_width
            );
        }

        let batch = self.patches_to_tensor(image)?;
        let patches = self.predict_batch(&batch)?;
        let (predicted, summary) = aggregate(&patches);

        Ok(ImagePrediction {
            path: image.path.clone(),
            timestamp: String::new(),
            dimensions: ImageDimensions::new(image.width, image.height),
            patch_width: image.patch_width,
            predicted,
            certainty: summary,
            patches,
        })
    }

    /// Packs normalized patch buffers into an NCHW tensor on the device.
    fn patches_to_tensor(&self, image: &ImagePatches) -> Result<Tensor> {
        let w = image.patch_width;
        let n = image.len();
        let mut flat = Vec::with_capacity(n * w * w);
        for patch in &image.patches {
            flat.extend_from_slice(patch);
        }
        Tensor::from_vec(flat, (n, 1, w, w), &self.device)
            .context("failed to build patch tensor")
    }
}

/// Aggregates per-patch predictions into a whole-image prediction.
///
/// The aggregate distribution is the certainty-weighted mean of the patch
/// probability vectors; the image-level prediction is its argmax. Falls back
/// to uniform weights when every patch is maximally uncertain.
fn aggregate(patches: &[PatchPrediction]) -> (usize, CertaintySummary) {
    let num_classes = patches[0].probabilities.len();
    let mut weighted = vec![0.0f32; num_classes];
    let mut weight_sum = 0.0f32;
    let mut mean = 0.0f32;
    let mut max = 0.0f32;

    for patch in patches {
        mean += patch.certainty;
        max = max.max(patch.certainty);
        for (acc, p) in weighted.iter_mut().zip(&patch.probabilities) {
            *acc += patch.certainty * p;
        }
        weight_sum += patch.certainty;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = patches.len() as f32;
    mean /= count;

    if weight_sum > 0.0 {
        for value in &mut weighted {
            *value /= weight_sum;
        }
    } else {
        // All patches fully uncertain; average without weights.
        weighted.fill(0.0);
        for patch in patches {
            for (acc, p) in weighted.iter_mut().zip(&patch.probabilities) {
                *acc += p / count;
            }
        }
    }

    let predicted = argmax(&weighted);
    let summary = CertaintySummary {
        mean,
        max,
        aggregate: certainty(&weighted),
    };
    (predicted, summary)
}
