//! Emotion classifier network.
//!
//! A FER-style CNN over 48x48 grayscale frames predicting one of seven
//! expression classes. Runs on the full frame: the scoring contract is
//! best-effort, so there is no face-detection gate in front of it.

// Allow common ML/image code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};

use crate::domain::Expression;

/// Side length of the square model input.
pub const INPUT_SIZE: usize = 48;

/// Emotion classifier model.
///
/// Architecture: 3 conv layers (3x3, padding 1) each followed by 2x2 max
/// pooling, then 2 fully-connected layers producing 7 class logits.
/// Input: 48x48 grayscale, normalized to `[0, 1]`.
pub struct EmotionNet {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl EmotionNet {
    /// Builds the network from pre-trained weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are missing or shaped wrong.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();
        let padded = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let conv1 = conv2d(1, 32, 3, padded, vb.pp("conv1"))?;
        let conv2 = conv2d(32, 64, 3, padded, vb.pp("conv2"))?;
        let conv3 = conv2d(64, 128, 3, padded, vb.pp("conv3"))?;

        // After 3 max pools of 2x2: 48 -> 24 -> 12 -> 6.
        // Flattened: 128 * 6 * 6 = 4608
        let fc1 = linear(4608, 256, vb.pp("fc1"))?;
        let fc2 = linear(256, Expression::ALL.len(), vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    /// Converts a decoded image into the model input tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn preprocess(&self, image: &image::DynamicImage) -> Result<Tensor> {
        let size = INPUT_SIZE as u32;
        let gray = image
            .resize_exact(size, size, image::imageops::FilterType::Triangle)
            .to_luma8();

        let data: Vec<f32> = gray.pixels().map(|p| f32::from(p[0]) / 255.0).collect();

        Tensor::from_vec(data, (1, 1, INPUT_SIZE, INPUT_SIZE), &self.device)
            .context("Failed to create input tensor")
    }

    /// Returns the dominant expression for a decoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    pub fn dominant(&self, image: &image::DynamicImage) -> Result<Expression> {
        let input = self.preprocess(image)?;
        let logits = self.forward(&input).context("Inference failed")?;
        let logits: Vec<f32> = logits.squeeze(0)?.to_vec1()?;

        let best = logits
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .context("Empty logit vector")?;

        Ok(Expression::ALL[best])
    }
}

impl Module for EmotionNet {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv1.forward(x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;

        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        self.fc2.forward(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fc_input_dimensions() {
        // 48 -> 24 -> 12 -> 6 after three 2x2 pools
        assert_eq!(INPUT_SIZE / 2 / 2 / 2, 6);
        assert_eq!(128 * 6 * 6, 4608);
    }

    #[test]
    fn test_one_logit_per_label() {
        assert_eq!(Expression::ALL.len(), 7);
    }
}
