use candle::{D, DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::clip::vision_model::{ClipVisionConfig, ClipVisionTransformer};
use std::path::Path;

struct ClipAestheticImpl {
    vision: ClipVisionTransformer,
    visual_projection: Linear,
    head: Linear,
}

impl ClipAestheticImpl {
    fn load(vb: VarBuilder, head_vb: VarBuilder, config: &ClipVisionConfig) -> Result<Self> {
        let vision = ClipVisionTransformer::new(vb.pp("vision_model"), config)?;
        let visual_projection = candle_nn::linear_no_bias(
            config.embed_dim,
            config.projection_dim,
            vb.pp("visual_projection"),
        )?;
        let head = candle_nn::linear(config.projection_dim, 1, head_vb)?;

        Ok(Self {
            vision,
            visual_projection,
            head,
        })
    }

    fn forward(&self, pixel_values: &Tensor) -> Result<Tensor> {
        let pooled = self.vision.forward(pixel_values)?;
        let features = self.visual_projection.forward(&pooled)?;
        // The head was trained on unit-norm embeddings.
        let features =
            features.broadcast_div(&features.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?)?;
        self.head.forward(&features)
    }
}

/// CLIP vision tower plus linear aesthetic head, resident on one device.
#[derive(Clone)]
pub struct ClipScorer(std::sync::Arc<ClipAestheticImpl>, Device);

impl ClipScorer {
    pub fn load(
        weights_path: &Path,
        head_path: &Path,
        config: &ClipVisionConfig,
        device: &Device,
    ) -> Result<Self> {
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };
        let head_vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[head_path], DType::F32, device)? };

        let model = ClipAestheticImpl::load(vb, head_vb, config)?;

        Ok(Self(std::sync::Arc::new(model), device.clone()))
    }

    pub fn device(&self) -> &Device {
        &self.1
    }

    /// Runs the model over a `[batch, 3, size, size]` tensor and returns
    /// one raw score per image.
    pub fn forward_batch(&self, pixel_values: &Tensor) -> Result<Vec<f32>> {
        let logits = self.0.forward(pixel_values)?;
        logits.flatten_all()?.to_vec1::<f32>()
    }
}
