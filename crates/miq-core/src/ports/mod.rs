//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the scoring core and external
//! adapters (filesystem, output, progress UI).

mod patch_source;
mod progress;
mod result_output;

pub use patch_source::PatchSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
