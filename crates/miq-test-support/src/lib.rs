//! Test support utilities for miq.
//!
//! Provides mocks, synthetic patch builders, and random-weight fixtures for
//! testing the scoring pipeline without trained checkpoints.
//!
//! # Example
//!
//! ```
//! use miq_test_support::{MockPatchSource, SyntheticPatchBuilder};
//!
//! // Two synthetic single-patch images
//! let crisp = SyntheticPatchBuilder::checkerboard("crisp", 16);
//! let flat = SyntheticPatchBuilder::uniform("flat", 16, 0.5);
//!
//! let source = MockPatchSource::new(vec![crisp, flat]);
//! ```

mod builders;
mod mocks;

pub use builders::{write_class_locked_weights, write_random_weights, SyntheticPatchBuilder};
pub use mocks::{MockPatchSource, MockProgressSink, MockResultOutput};
