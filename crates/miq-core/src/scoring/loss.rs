//! Training objective selection.

use anyhow::{Context, Result};
use candle_core::{Tensor, D};
use candle_nn::ops::{log_softmax, softmax};

use super::ranked_probability_score;

/// Training objective for the focus-quality classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    /// Mean softmax cross-entropy against one-hot labels.
    #[default]
    CrossEntropy,
    /// Mean ranked probability score against one-hot labels.
    ///
    /// Rank-aware: predictions further from the true quality level cost more.
    RankedProbability,
}

/// Computes the scalar training loss for a batch.
///
/// # Arguments
///
/// * `logits` - Unnormalized class scores of shape `[batch_size, num_classes]`.
/// * `one_hot_labels` - Targets of the same shape; each row sums to one.
///   Integer dtypes are coerced to the logits' dtype.
/// * `objective` - Which loss to apply.
///
/// # Errors
///
/// Returns an error if the shapes differ or a tensor operation fails.
pub fn distribution_loss(
    logits: &Tensor,
    one_hot_labels: &Tensor,
    objective: Objective,
) -> Result<Tensor> {
    if logits.dims() != one_hot_labels.dims() {
        anyhow::bail!(
            "logits and labels must have matching shapes (got {:?} and {:?})",
            logits.dims(),
            one_hot_labels.dims()
        );
    }

    match objective {
        Objective::CrossEntropy => {
            let log_probs = log_softmax(logits, D::Minus1)?;
            let labels = one_hot_labels
                .to_dtype(logits.dtype())
                .context("failed to cast labels")?;
            let per_item = (log_probs * labels)?.sum(D::Minus1)?.neg()?;
            per_item
                .mean_all()
                .context("failed to reduce cross-entropy loss")
        }
        Objective::RankedProbability => {
            let probabilities = softmax(logits, D::Minus1)?;
            let class_dim = logits.rank() - 1;
            let scores = ranked_probability_score(&probabilities, one_hot_labels, class_dim)?;
            scores
                .mean_all()
                .context("failed to reduce ranked probability loss")
        }
    }
}
