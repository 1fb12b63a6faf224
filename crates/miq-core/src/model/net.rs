//! The Miq focus-quality network.
//!
//! A small MNIST-style stack: two convolutions with pooling, then two fully
//! connected layers with dropout in between. The output is a set of logits;
//! apply softmax to obtain a probability distribution over quality classes.

// Allow common ML code patterns
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::Tensor;
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Dropout, Linear, ModuleT, VarBuilder};

use super::ModelVariant;

/// Default number of rank-ordered quality classes.
pub const DEFAULT_NUM_CLASSES: usize = 11;

/// Default patch side length in pixels.
pub const DEFAULT_PATCH_WIDTH: usize = 84;

/// Dropout probability between the fully connected layers.
const DROPOUT_P: f32 = 0.5;

/// Model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiqConfig {
    /// Number of quality classes.
    pub num_classes: usize,
    /// Side length of square input patches in pixels.
    pub patch_width: usize,
    /// Model variant (second-convolution dilation).
    pub variant: ModelVariant,
}

impl Default for MiqConfig {
    fn default() -> Self {
        Self {
            num_classes: DEFAULT_NUM_CLASSES,
            patch_width: DEFAULT_PATCH_WIDTH,
            variant: ModelVariant::Standard,
        }
    }
}

impl MiqConfig {
    /// Spatial side length after the two 2x2 pooling layers.
    ///
    /// Both convolutions are SAME-padded, so only pooling changes the size.
    #[must_use]
    pub const fn pooled_width(&self) -> usize {
        self.patch_width / 2 / 2
    }
}

/// The Miq convolutional network.
///
/// Architecture, in order:
/// 1. conv 32 filters 5x5, SAME padding, ReLU
/// 2. max pool 2x2, stride 2
/// 3. conv 64 filters 5x5, SAME padding, variant dilation, ReLU
/// 4. max pool 2x2, stride 2
/// 5. flatten
/// 6. fully connected 1024, ReLU
/// 7. dropout 0.5 (training only)
/// 8. fully connected `num_classes`, no activation
pub struct MiqNet {
    conv1: Conv2d,
    conv2: Conv2d,
    fc3: Linear,
    fc4: Linear,
    dropout: Dropout,
    config: MiqConfig,
}

impl MiqNet {
    /// Builds the network from weights.
    ///
    /// The weight path prefixes are `conv1`, `conv2`, `fc3`, and `fc4`.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch width is too small to survive both
    /// pooling layers, or if any layer's weights cannot be created.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder, config: &MiqConfig) -> Result<Self> {
        if config.pooled_width() == 0 {
            anyhow::bail!(
                "patch width {} collapses to zero after pooling; minimum is 4",
                config.patch_width
            );
        }
        if config.num_classes == 0 {
            anyhow::bail!("number of classes must be at least 1");
        }

        let conv1 = conv2d(
            1,
            32,
            5,
            Conv2dConfig {
                padding: 2,
                ..Conv2dConfig::default()
            },
            vb.pp("conv1"),
        )
        .context("failed to build conv1")?;

        // SAME padding for a dilated 5x5 kernel: dilation * (5 - 1) / 2.
        let dilation = config.variant.dilation();
        let conv2 = conv2d(
            32,
            64,
            5,
            Conv2dConfig {
                padding: 2 * dilation,
                dilation,
                ..Conv2dConfig::default()
            },
            vb.pp("conv2"),
        )
        .context("failed to build conv2")?;

        let pooled = config.pooled_width();
        let fc3 = linear(64 * pooled * pooled, 1024, vb.pp("fc3")).context("failed to build fc3")?;
        let fc4 = linear(1024, config.num_classes, vb.pp("fc4")).context("failed to build fc4")?;

        Ok(Self {
            conv1,
            conv2,
            fc3,
            fc4,
            dropout: Dropout::new(DROPOUT_P),
            config: *config,
        })
    }

    /// The configuration this network was built with.
    #[must_use]
    pub const fn config(&self) -> &MiqConfig {
        &self.config
    }
}

impl ModuleT for MiqNet {
    /// Maps a patch batch `[batch, 1, patch_width, patch_width]` to logits
    /// `[batch, num_classes]`.
    ///
    /// The training flag only affects dropout: stochastic zeroing during
    /// training, identity at inference.
    fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        // Conv1 + ReLU + pool
        let x = self.conv1.forward_t(xs, train)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Conv2 (variant dilation) + ReLU + pool
        let x = self.conv2.forward_t(&x, train)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Flatten to [batch, 64 * pooled^2]
        let x = x.flatten_from(1)?;

        // FC3 + ReLU
        let x = self.fc3.forward_t(&x, train)?;
        let x = x.relu()?;

        let x = self.dropout.forward_t(&x, train)?;

        // FC4: logits, no activation
        self.fc4.forward_t(&x, train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    fn random_net(config: &MiqConfig) -> MiqNet {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        MiqNet::new(vb, config).expect("random-init net")
    }

    fn patch_batch(batch: usize, patch_width: usize) -> Tensor {
        Tensor::ones((batch, 1, patch_width, patch_width), DType::F32, &Device::Cpu)
            .expect("patch batch")
    }

    #[test]
    fn test_logits_shape_for_both_variants() {
        for variant in [ModelVariant::Standard, ModelVariant::Dilated] {
            let config = MiqConfig {
                num_classes: 11,
                patch_width: 16,
                variant,
            };
            let net = random_net(&config);
            let logits = net
                .forward_t(&patch_batch(3, 16), false)
                .expect("forward");
            assert_eq!(logits.dims(), &[3, 11], "variant {variant}");
        }
    }

    #[test]
    fn test_inference_forward_is_deterministic() {
        let config = MiqConfig {
            num_classes: 4,
            patch_width: 12,
            variant: ModelVariant::Standard,
        };
        let net = random_net(&config);
        let batch = patch_batch(2, 12);
        let a = net
            .forward_t(&batch, false)
            .expect("first forward")
            .to_vec2::<f32>()
            .expect("values");
        let b = net
            .forward_t(&batch, false)
            .expect("second forward")
            .to_vec2::<f32>()
            .expect("values");
        assert_eq!(a, b);
    }

    #[test]
    fn test_pooled_width_floors_odd_sizes() {
        let config = MiqConfig {
            num_classes: 2,
            patch_width: 84,
            variant: ModelVariant::Standard,
        };
        assert_eq!(config.pooled_width(), 21);

        let odd = MiqConfig {
            patch_width: 10,
            ..config
        };
        // 10 -> 5 -> 2, matching two floor-halving pools.
        assert_eq!(odd.pooled_width(), 2);
    }

    #[test]
    fn test_odd_patch_width_forward() {
        // Pooling floors odd intermediate sizes; the flatten dim must agree.
        let config = MiqConfig {
            num_classes: 3,
            patch_width: 10,
            variant: ModelVariant::Dilated,
        };
        let net = random_net(&config);
        let logits = net.forward_t(&patch_batch(1, 10), false).expect("forward");
        assert_eq!(logits.dims(), &[1, 3]);
    }

    #[test]
    fn test_tiny_patch_width_is_rejected() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let config = MiqConfig {
            num_classes: 2,
            patch_width: 3,
            variant: ModelVariant::Standard,
        };
        assert!(MiqNet::new(vb, &config).is_err());
    }
}
