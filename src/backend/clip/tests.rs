use super::*;

use std::fs::{self, File};
use tempfile::TempDir;

mod variant_tests {
    use super::*;

    #[test]
    fn test_variant_dimension_table() {
        assert_eq!(ClipVariant::VitL14.projection_dim(), 768);
        assert_eq!(ClipVariant::VitB32.projection_dim(), 512);
    }

    #[test]
    fn test_variant_names_match_registry() {
        assert_eq!(ClipVariant::VitL14.dir_name(), "laion-vit-l-14");
        assert_eq!(ClipVariant::VitB32.dir_name(), "laion-vit-b-32");
    }

    #[test]
    fn test_vision_config_consistency() {
        for variant in [ClipVariant::VitL14, ClipVariant::VitB32] {
            let config = variant.vision_config();
            assert_eq!(config.projection_dim, variant.projection_dim());
            assert_eq!(config.image_size, variant.image_size());
            assert_eq!(config.num_channels, 3);
            assert_eq!(
                config.embed_dim % config.num_attention_heads,
                0,
                "head dim must divide evenly for {:?}",
                variant
            );
        }
    }
}

mod load_tests {
    use super::*;

    fn config(dir: &TempDir) -> BackendConfig {
        BackendConfig {
            model_dir: dir.path().to_path_buf(),
            device: Some(ScoreDevice::Cpu),
        }
    }

    #[test]
    fn test_missing_variant_directory() {
        let dir = TempDir::new().expect("create temp dir");
        let result = ClipBackend::load(&config(&dir), ClipVariant::VitL14);
        match result {
            Err(BackendError::ModelNotFound { path }) => {
                assert!(path.ends_with("laion-vit-l-14"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other.map(|b| format!("{b:?}"))),
        }
    }

    #[test]
    fn test_missing_weights_file() {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir(dir.path().join("laion-vit-b-32")).expect("create dir");

        let result = ClipBackend::load(&config(&dir), ClipVariant::VitB32);
        match result {
            Err(BackendError::ModelNotFound { path }) => {
                assert!(path.ends_with("model.safetensors"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other.map(|b| format!("{b:?}"))),
        }
    }

    #[test]
    fn test_missing_head_file() {
        let dir = TempDir::new().expect("create temp dir");
        let weight_dir = dir.path().join("laion-vit-b-32");
        fs::create_dir(&weight_dir).expect("create dir");
        File::create(weight_dir.join("model.safetensors")).expect("create file");

        let result = ClipBackend::load(&config(&dir), ClipVariant::VitB32);
        match result {
            Err(BackendError::ModelNotFound { path }) => {
                assert!(path.ends_with("head.safetensors"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other.map(|b| format!("{b:?}"))),
        }
    }

    #[test]
    fn test_garbage_weights_fail_to_load() {
        let dir = TempDir::new().expect("create temp dir");
        let weight_dir = dir.path().join("laion-vit-b-32");
        fs::create_dir(&weight_dir).expect("create dir");
        fs::write(weight_dir.join("model.safetensors"), b"not safetensors").expect("write");
        fs::write(weight_dir.join("head.safetensors"), b"also not").expect("write");

        let result = ClipBackend::load(&config(&dir), ClipVariant::VitB32);
        assert!(matches!(result, Err(BackendError::ModelLoadFailed { .. })));
    }
}

mod preprocess_tests {
    use super::*;
    use candle_core::Device;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let result = preprocess::load_image(Path::new("/definitely/not/here.jpg"), 32, &Device::Cpu);
        assert!(matches!(result, Err(BackendError::NotFound { .. })));
    }

    #[test]
    fn test_garbage_bytes_are_unsupported_format() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not a jpeg").expect("write");

        let result = preprocess::load_image(&path, 32, &Device::Cpu);
        assert!(matches!(result, Err(BackendError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_decoded_image_shape_and_range() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(8, 8, Rgb([255, 0, 0]))
            .save(&path)
            .expect("save image");

        let tensor = preprocess::load_image(&path, 32, &Device::Cpu).expect("load image");
        assert_eq!(tensor.dims(), &[3, 32, 32]);

        let values: Vec<f32> = tensor
            .flatten_all()
            .expect("flatten")
            .to_vec1()
            .expect("to vec");
        // CLIP normalization keeps pixel channels within a few standard
        // deviations of zero.
        for value in values {
            assert!(value.is_finite());
            assert!(value.abs() < 4.0, "value {value} outside expected range");
        }
    }

    #[test]
    fn test_non_square_image_center_cropped() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(64, 16, Rgb([0, 128, 255]))
            .save(&path)
            .expect("save image");

        let tensor = preprocess::load_image(&path, 16, &Device::Cpu).expect("load image");
        assert_eq!(tensor.dims(), &[3, 16, 16]);
    }
}
