//! Image decoding and CLIP input preparation.

use std::path::Path;

use candle_core::{Device, Tensor};
use image::GenericImageView;
use image::imageops::FilterType;

use crate::backend::BackendError;

/// CLIP normalization constants (RGB mean / std).
const MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Loads `path` and produces a `[3, size, size]` normalized NCHW tensor.
///
/// Short side is resized to `size` (CatmullRom), then center-cropped, to
/// match the preprocessing the towers were trained with.
pub(super) fn load_image(
    path: &Path,
    size: usize,
    device: &Device,
) -> Result<Tensor, BackendError> {
    let img = image::open(path).map_err(|e| BackendError::from_image(e, path))?;

    let (width, height) = img.dimensions();
    let side = size as u32;
    let (new_width, new_height) = if width <= height {
        (side, (height * side).div_ceil(width).max(side))
    } else {
        ((width * side).div_ceil(height).max(side), side)
    };
    let resized = img.resize_exact(new_width, new_height, FilterType::CatmullRom);
    let cropped = resized.crop_imm((new_width - side) / 2, (new_height - side) / 2, side, side);
    let rgb = cropped.to_rgb8();

    let plane = size * size;
    let mut data = vec![0f32; 3 * plane];
    for (index, pixel) in rgb.pixels().enumerate() {
        for channel in 0..3 {
            data[channel * plane + index] =
                (pixel[channel] as f32 / 255.0 - MEAN[channel]) / STD[channel];
        }
    }

    Tensor::from_vec(data, (3, size, size), device)
        .map_err(|e| BackendError::from_candle(&e, path))
}
