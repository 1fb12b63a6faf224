//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Returns the best available device for inference.
///
/// Prefers the GPU when the corresponding feature is enabled (Metal on macOS,
/// CUDA elsewhere) and falls back to the CPU. The returned device is owned by
/// the caller and threaded through model building and scoring explicitly.
#[must_use]
pub fn best_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Scoring on Metal device");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Scoring on CUDA device");
            return device;
        }
    }

    info!("Scoring on CPU");
    Device::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_device_always_resolves() {
        // Must not panic no matter which features are compiled in.
        let _device = best_device();
    }
}
