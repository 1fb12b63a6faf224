//! Shared inference utilities.

/// Normalized-entropy certainty of a probability distribution.
///
/// Returns `1 - H(p) / ln(K)`, clamped to `[0, 1]`: one-hot distributions
/// score 1, the uniform distribution scores 0. A single-class distribution is
/// fully certain by definition.
#[must_use]
pub fn certainty(probabilities: &[f32]) -> f32 {
    let k = probabilities.len();
    if k <= 1 {
        return 1.0;
    }

    let entropy: f32 = probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.ln())
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let max_entropy = (k as f32).ln();
    (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
}

/// Index of the largest probability; ties resolve to the lowest rank.
#[must_use]
pub fn argmax(probabilities: &[f32]) -> usize {
    let mut best = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > probabilities[best] {
            best = i;
        }
    }
    best
}
