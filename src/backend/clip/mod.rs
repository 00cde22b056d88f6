//! CLIP-based aesthetic backend.
//!
//! Pairs a published CLIP vision tower with a one-unit linear head
//! trained on its projected, unit-norm image embeddings. Weights are
//! mmap'd safetensors under `<model_dir>/<variant>/`:
//!
//! - `model.safetensors`: CLIP weights (HuggingFace tensor naming)
//! - `head.safetensors`: aesthetic head (`weight`, `bias`)

mod model;
mod preprocess;

#[cfg(test)]
mod tests;

pub use model::ClipScorer;

use std::path::{Path, PathBuf};

use candle_core::Tensor;
use candle_transformers::models::clip::text_model::Activation;
use candle_transformers::models::clip::vision_model::ClipVisionConfig;
use tracing::{debug, info};

use super::device::{select_device, to_candle};
use super::registry::BackendConfig;
use super::{AestheticBackend, BackendError, ScoreDevice};

/// Published CLIP variants with an aesthetic head available for their
/// projected embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipVariant {
    /// ViT-L/14, 768-dim projected embeddings. The default.
    VitL14,
    /// ViT-B/32, 512-dim projected embeddings; lighter, for CPU runs.
    VitB32,
}

impl ClipVariant {
    /// Subdirectory (and registry) name of this variant.
    pub fn dir_name(self) -> &'static str {
        match self {
            ClipVariant::VitL14 => "laion-vit-l-14",
            ClipVariant::VitB32 => "laion-vit-b-32",
        }
    }

    /// Dimension of the projected image features the head consumes.
    pub fn projection_dim(self) -> usize {
        match self {
            ClipVariant::VitL14 => 768,
            ClipVariant::VitB32 => 512,
        }
    }

    /// Input resolution of the vision tower.
    pub fn image_size(self) -> usize {
        224
    }

    pub(crate) fn vision_config(self) -> ClipVisionConfig {
        match self {
            ClipVariant::VitL14 => ClipVisionConfig {
                embed_dim: 1024,
                activation: Activation::QuickGelu,
                intermediate_size: 4096,
                num_hidden_layers: 24,
                num_attention_heads: 16,
                projection_dim: 768,
                num_channels: 3,
                image_size: 224,
                patch_size: 14,
            },
            ClipVariant::VitB32 => ClipVisionConfig {
                embed_dim: 768,
                activation: Activation::QuickGelu,
                intermediate_size: 3072,
                num_hidden_layers: 12,
                num_attention_heads: 12,
                projection_dim: 512,
                num_channels: 3,
                image_size: 224,
                patch_size: 32,
            },
        }
    }
}

/// CLIP aesthetic scorer with per-device weight residency.
///
/// Holds weights for its primary device and, when the primary is a GPU,
/// a CPU copy used for capacity fallback. Weights are mmap'd, so the
/// extra copy costs little until it is actually exercised.
pub struct ClipBackend {
    variant: ClipVariant,
    device: ScoreDevice,
    primary: ClipScorer,
    cpu_fallback: Option<ClipScorer>,
}

impl std::fmt::Debug for ClipBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipBackend")
            .field("variant", &self.variant)
            .field("device", &self.device)
            .field("cpu_fallback", &self.cpu_fallback.is_some())
            .finish()
    }
}

impl ClipBackend {
    /// Loads the variant's weights from `config.model_dir`.
    pub fn load(config: &BackendConfig, variant: ClipVariant) -> Result<Self, BackendError> {
        let weight_dir = config.model_dir.join(variant.dir_name());
        if !weight_dir.is_dir() {
            return Err(BackendError::ModelNotFound { path: weight_dir });
        }

        let weights_path = weight_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(BackendError::ModelNotFound { path: weights_path });
        }

        let head_path = weight_dir.join("head.safetensors");
        if !head_path.exists() {
            return Err(BackendError::ModelNotFound { path: head_path });
        }

        let device = config.device.unwrap_or_else(select_device);
        let vision_config = variant.vision_config();

        info!(
            variant = variant.dir_name(),
            device = %device,
            "loading CLIP aesthetic model"
        );

        let candle_device = to_candle(device).map_err(|e| BackendError::Device {
            reason: e.to_string(),
        })?;
        let primary = ClipScorer::load(&weights_path, &head_path, &vision_config, &candle_device)
            .map_err(|e| BackendError::ModelLoadFailed {
                reason: e.to_string(),
            })?;

        let cpu_fallback = if device.is_cpu() {
            None
        } else {
            let scorer = ClipScorer::load(
                &weights_path,
                &head_path,
                &vision_config,
                &candle_core::Device::Cpu,
            )
            .map_err(|e| BackendError::ModelLoadFailed {
                reason: e.to_string(),
            })?;
            Some(scorer)
        };

        Ok(Self {
            variant,
            device,
            primary,
            cpu_fallback,
        })
    }

    pub fn variant(&self) -> ClipVariant {
        self.variant
    }

    fn scorer_for(&self, device: ScoreDevice) -> Result<&ClipScorer, BackendError> {
        if device == self.device {
            Ok(&self.primary)
        } else if device.is_cpu() {
            self.cpu_fallback.as_ref().ok_or_else(|| BackendError::Device {
                reason: format!("no weights resident on {device}"),
            })
        } else {
            Err(BackendError::Device {
                reason: format!("no weights resident on {device}"),
            })
        }
    }
}

impl AestheticBackend for ClipBackend {
    fn name(&self) -> &str {
        self.variant.dir_name()
    }

    fn device(&self) -> ScoreDevice {
        self.device
    }

    fn predict(&self, image: &Path, device: ScoreDevice) -> Result<f32, BackendError> {
        let scorer = self.scorer_for(device)?;
        let pixels = preprocess::load_image(image, self.variant.image_size(), scorer.device())?;
        let batch = pixels
            .unsqueeze(0)
            .map_err(|e| BackendError::from_candle(&e, image))?;
        let scores = scorer
            .forward_batch(&batch)
            .map_err(|e| BackendError::from_candle(&e, image))?;

        scores.first().copied().ok_or_else(|| BackendError::Inference {
            path: image.to_path_buf(),
            reason: "model returned no score".to_string(),
        })
    }

    fn batch_predict(
        &self,
        images: &[PathBuf],
        device: ScoreDevice,
    ) -> Result<Vec<f32>, BackendError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let scorer = self.scorer_for(device)?;
        let mut tensors = Vec::with_capacity(images.len());
        for image in images {
            tensors.push(preprocess::load_image(
                image,
                self.variant.image_size(),
                scorer.device(),
            )?);
        }

        debug!(count = images.len(), device = %device, "running batched forward pass");

        let batch =
            Tensor::stack(&tensors, 0).map_err(|e| BackendError::from_candle(&e, &images[0]))?;
        scorer
            .forward_batch(&batch)
            .map_err(|e| BackendError::from_candle(&e, &images[0]))
    }
}
