//! Scoring rules and training objectives.
//!
//! The ranked probability score is the one piece of numeric machinery that is
//! specific to ordered-class problems like focus quality; cross-entropy is
//! provided alongside it as the conventional alternative.

mod loss;
mod rps;

pub use loss::{distribution_loss, Objective};
pub use rps::ranked_probability_score;
