//! Safetensors weight loading and lazy model initialization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use once_cell::sync::OnceCell;
use safetensors::SafeTensors;
use tracing::debug;

/// A model whose weights are loaded on first use.
///
/// Loading is attempted at most once; a failed load is cached so every
/// subsequent access reports the same error instead of re-reading the
/// file per image.
pub struct LazyModel<T> {
    path: PathBuf,
    device: Device,
    build: fn(VarBuilder) -> Result<T>,
    cell: OnceCell<std::result::Result<T, String>>,
}

impl<T: Send + Sync> LazyModel<T> {
    /// Defers loading of the model at `path` until [`LazyModel::get`].
    #[must_use]
    pub fn new(path: impl AsRef<Path>, device: Device, build: fn(VarBuilder) -> Result<T>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            device,
            build,
            cell: OnceCell::new(),
        }
    }

    /// Returns the model, loading it if this is the first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights file cannot be read or parsed, or
    /// the model cannot be built from it.
    pub fn get(&self) -> Result<&T> {
        let loaded = self.cell.get_or_init(|| {
            load_weights(&self.path, &self.device)
                .and_then(|vb| (self.build)(vb))
                .map_err(|e| format!("{e:#}"))
        });
        loaded.as_ref().map_err(|e| anyhow::anyhow!("{e}"))
    }
}

/// Reads a safetensors file into a `VarBuilder` on the given device.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid
/// safetensors data.
pub fn load_weights(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading weights from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let mut map: HashMap<String, Tensor> = HashMap::new();
    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("Failed to get tensor '{name}'"))?;
        let dtype = to_candle_dtype(view.dtype())?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?;
        map.insert(name.to_string(), tensor);
    }

    Ok(VarBuilder::from_tensors(map, DType::F32, device))
}

fn to_candle_dtype(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::I64 => Ok(DType::I64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        other => anyhow::bail!("Unsupported dtype: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_weights_missing_file() {
        let result = load_weights("/nonexistent/model.safetensors", &Device::Cpu);
        assert!(result.is_err());
    }

    #[test]
    fn test_lazy_model_caches_load_failure() {
        #[derive(Debug)]
        struct Never;
        let model: LazyModel<Never> = LazyModel::new(
            "/nonexistent/model.safetensors",
            Device::Cpu,
            |_| anyhow::bail!("unreachable"),
        );

        let first = model.get().unwrap_err().to_string();
        let second = model.get().unwrap_err().to_string();
        assert_eq!(first, second);
    }
}
