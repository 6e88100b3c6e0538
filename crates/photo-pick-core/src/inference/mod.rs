//! ML inference engine using Candle.
//!
//! Hosts the emotion classifier network and the shared model-loading
//! plumbing (device selection, safetensors weights).

mod device;
mod emotion;
mod loader;

pub use device::get_device;
pub use emotion::EmotionNet;
pub use loader::{load_weights, LazyModel};
