//! Inference engine built on Candle.
//!
//! Device selection, safetensors weight loading, and the patch-batch
//! predictor. The execution device is created once by the caller and passed
//! in explicitly; nothing here keeps ambient global state.

mod device;
mod loader;
mod predictor;
pub mod utils;

pub use device::best_device;
pub use loader::load_safetensors;
pub use predictor::Predictor;
