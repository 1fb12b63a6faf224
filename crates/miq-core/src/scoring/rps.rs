//! Ranked probability score.

use anyhow::{Context, Result};
use candle_core::{DType, Tensor};

/// Computes the Ranked Probability Score (RPS).
///
/// RPS is given by
///
/// ```text
/// sum_{k=1}^K (CDF_prediction(k) - CDF_target(k))^2
/// ```
///
/// where CDF denotes the empirical CDF along `class_dim` and each value of `k`
/// is a different class, in rank order. Possible values lie in `[0, K - 1]`;
/// perfect predictions score zero, and for deterministic (one-hot) predictions
/// the score equals the rank distance between predicted and target class.
///
/// Unlike cross-entropy, RPS penalizes wrong guesses more harshly the further
/// they land from the target class, which is what makes it the right metric
/// for ordered targets such as focus-quality levels. Like cross-entropy it is
/// a strictly proper scoring rule: expected score is minimized by predicting
/// the true distribution.
///
/// Reference: Murphy AH, "A Note on the Ranked Probability Score",
/// J. Appl. Meteorol. 1971, 10:155-156.
///
/// # Arguments
///
/// * `predictions` - Class probabilities, any floating dtype.
/// * `targets` - One-hot (or soft) target distribution of the same shape.
///   Integer dtypes are coerced to the predictions' dtype.
/// * `class_dim` - Dimension indexing the ranked classes in both tensors.
///
/// # Returns
///
/// A tensor with `class_dim` reduced away, one score per remaining index.
///
/// # Errors
///
/// Returns an error if the shapes differ, if the dtypes cannot be reconciled,
/// or if `class_dim` is out of range.
pub fn ranked_probability_score(
    predictions: &Tensor,
    targets: &Tensor,
    class_dim: usize,
) -> Result<Tensor> {
    if predictions.dims() != targets.dims() {
        anyhow::bail!(
            "predictions and targets must have matching shapes (got {:?} and {:?})",
            predictions.dims(),
            targets.dims()
        );
    }
    if class_dim >= predictions.rank() {
        anyhow::bail!(
            "class dimension {class_dim} is out of range for rank-{} tensors",
            predictions.rank()
        );
    }

    let targets = coerce_targets(predictions, targets)?;

    let cdf_pred = predictions
        .cumsum(class_dim)
        .context("failed to accumulate prediction CDF")?;
    let cdf_target = targets
        .cumsum(class_dim)
        .context("failed to accumulate target CDF")?;

    let diff = (cdf_pred - cdf_target)?;
    diff.sqr()?
        .sum(class_dim)
        .context("failed to reduce ranked probability score")
}

/// Casts integer targets to the predictions' floating dtype.
///
/// Mixed floating dtypes are rejected rather than silently widened.
fn coerce_targets(predictions: &Tensor, targets: &Tensor) -> Result<Tensor> {
    let (pred_dtype, target_dtype) = (predictions.dtype(), targets.dtype());
    if pred_dtype == target_dtype {
        return Ok(targets.clone());
    }
    match (pred_dtype, target_dtype) {
        (
            DType::F16 | DType::BF16 | DType::F32 | DType::F64,
            DType::U8 | DType::U32 | DType::I64,
        ) => targets
            .to_dtype(pred_dtype)
            .context("failed to cast integer targets"),
        _ => anyhow::bail!(
            "cannot score {target_dtype:?} targets against {pred_dtype:?} predictions"
        ),
    }
}
