//! Emotion classifier adapter.
//!
//! Wraps the trained face-emotion network behind a small trait: a normalized
//! 48x48 grayscale image in, a probability per emotion label out. Weights are
//! probed from an ordered list of candidate safetensors paths; the first
//! loadable one wins.

use anyhow::{anyhow, Context};
use candle_core::{DType, Device, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};
use image::imageops::FilterType;
use mira_common::emotion::EMOTION_COUNT;
use mira_common::{AnalysisError, EmotionScores};
use std::path::Path;
use tracing::{info, warn};

/// Input edge length expected by the network.
pub const INPUT_SIZE: usize = 48;

/// Anything that maps a preprocessed face image to emotion probabilities.
///
/// `pixels` is a row-major 48x48 grayscale buffer scaled to [0,1].
pub trait EmotionClassifier: Send + Sync {
    fn predict(&self, pixels: &[f32]) -> Result<EmotionScores, AnalysisError>;
}

/// Decode raw upload bytes into the network's input buffer: grayscale,
/// resized to 48x48, pixel values scaled to [0,1].
pub fn preprocess(bytes: &[u8]) -> Result<Vec<f32>, AnalysisError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::InvalidImage(format!("Could not decode image: {e}")))?;

    let gray = decoded.to_luma8();
    let resized = image::imageops::resize(
        &gray,
        INPUT_SIZE as u32,
        INPUT_SIZE as u32,
        FilterType::Triangle,
    );

    Ok(resized.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect())
}

/// Compact convolutional emotion network: three conv/pool blocks and a
/// two-layer head, softmax over the seven emotion classes.
#[derive(Debug)]
pub struct EmotionCnn {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl EmotionCnn {
    /// Probe the candidate weight paths in order and build the network from
    /// the first one that loads.
    pub fn load(candidates: &[String]) -> Result<Self, AnalysisError> {
        let device = Device::Cpu;
        let mut last_error = None;

        for path in candidates {
            match Self::load_from(Path::new(path), &device) {
                Ok(model) => {
                    info!("Emotion model loaded from {}", path);
                    return Ok(model);
                }
                Err(e) => {
                    warn!("Could not load emotion model from {}: {:#}", path, e);
                    last_error = Some(e);
                }
            }
        }

        Err(AnalysisError::ModelUnavailable(match last_error {
            Some(e) => format!("{e:#}"),
            None => "no candidate weight paths configured".to_string(),
        }))
    }

    fn load_from(path: &Path, device: &Device) -> anyhow::Result<Self> {
        if !path.exists() {
            return Err(anyhow!("{} does not exist", path.display()));
        }

        let tensors = candle_core::safetensors::load(path, device)
            .with_context(|| format!("failed to read weights from {}", path.display()))?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        Self::build(vb, device.clone()).context("weight layout does not match the network")
    }

    /// Untrained network with all-zero weights. Predicts a uniform
    /// distribution; used by tests and smoke checks.
    pub fn zeroed() -> Result<Self, AnalysisError> {
        let device = Device::Cpu;
        let vb = VarBuilder::zeros(DType::F32, &device);
        Self::build(vb, device).map_err(|e| AnalysisError::Unexpected(e.to_string()))
    }

    fn build(vb: VarBuilder, device: Device) -> candle_core::Result<Self> {
        let conv_cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };

        let conv1 = conv2d(1, 32, 3, conv_cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(32, 64, 3, conv_cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(64, 128, 3, conv_cfg, vb.pp("conv3"))?;
        // Three 2x pools take 48 down to 6.
        let fc1 = linear(128 * 6 * 6, 256, vb.pp("fc1"))?;
        let fc2 = linear(256, EMOTION_COUNT, vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    fn forward(&self, input: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv1.forward(input)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        let logits = self.fc2.forward(&x)?;
        candle_nn::ops::softmax(&logits, 1)
    }
}

impl EmotionClassifier for EmotionCnn {
    fn predict(&self, pixels: &[f32]) -> Result<EmotionScores, AnalysisError> {
        if pixels.len() != INPUT_SIZE * INPUT_SIZE {
            return Err(AnalysisError::Unexpected(format!(
                "expected {} input pixels, got {}",
                INPUT_SIZE * INPUT_SIZE,
                pixels.len()
            )));
        }

        let input = Tensor::from_vec(
            pixels.to_vec(),
            (1, 1, INPUT_SIZE, INPUT_SIZE),
            &self.device,
        )
        .map_err(|e| AnalysisError::Unexpected(e.to_string()))?;

        let probs = self
            .forward(&input)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| AnalysisError::Unexpected(e.to_string()))?;

        Ok(EmotionScores::from_vec(&probs))
    }
}
