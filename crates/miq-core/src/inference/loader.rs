//! Weight loading from safetensors files.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

/// Loads a safetensors file and creates a `VarBuilder` for model construction.
///
/// All tensors are placed on `device`; the builder reports `F32` as its
/// working dtype.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the safetensors payload is
/// invalid, or a tensor uses a dtype Candle cannot represent.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading weights from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("failed to read weights file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();
    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("failed to get tensor '{name}'"))?;

        let dtype = candle_dtype(view.dtype())?;
        let shape: Vec<usize> = view.shape().to_vec();

        let tensor = Tensor::from_raw_buffer(view.data(), dtype, &shape, device)
            .with_context(|| format!("failed to create tensor '{name}'"))?;
        tensor_map.insert(name.clone(), tensor);
    }

    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

/// Maps a safetensors dtype onto the Candle equivalent.
fn candle_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        S::I64 => Ok(DType::I64),
        other => anyhow::bail!("unsupported weight dtype: {other:?}"),
    }
}
