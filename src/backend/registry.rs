//! Name-keyed backend construction.

use std::path::PathBuf;

use tracing::info;

use super::clip::{ClipBackend, ClipVariant};
use super::stub::StubBackend;
use super::{AestheticBackend, BackendError, ScoreDevice};

/// Construction inputs shared by all registry entries.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Directory holding one weights subdirectory per variant.
    pub model_dir: PathBuf,
    /// Requested device, or `None` to probe (metal, then cuda, then cpu).
    pub device: Option<ScoreDevice>,
}

const BACKENDS: [&str; 3] = ["laion-vit-l-14", "laion-vit-b-32", "stub"];

/// Names accepted by [`create_backend`].
pub fn available_backends() -> &'static [&'static str] {
    &BACKENDS
}

/// Builds the backend registered under `name`.
pub fn create_backend(
    name: &str,
    config: &BackendConfig,
) -> Result<Box<dyn AestheticBackend>, BackendError> {
    let backend: Box<dyn AestheticBackend> = match name {
        "laion-vit-l-14" => Box::new(ClipBackend::load(config, ClipVariant::VitL14)?),
        "laion-vit-b-32" => Box::new(ClipBackend::load(config, ClipVariant::VitB32)?),
        "stub" => Box::new(StubBackend::new()),
        _ => {
            return Err(BackendError::UnknownBackend {
                name: name.to_string(),
                available: BACKENDS.join(", "),
            });
        }
    };

    info!(backend = backend.name(), device = %backend.device(), "backend ready");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> BackendConfig {
        BackendConfig {
            model_dir: dir.path().to_path_buf(),
            device: Some(ScoreDevice::Cpu),
        }
    }

    #[test]
    fn test_registry_lists_every_entry() {
        let names = available_backends();
        assert!(names.contains(&"laion-vit-l-14"));
        assert!(names.contains(&"laion-vit-b-32"));
        assert!(names.contains(&"stub"));
    }

    #[test]
    fn test_stub_needs_no_weights() {
        let dir = TempDir::new().expect("create temp dir");
        let backend = create_backend("stub", &config(&dir)).expect("create stub");
        assert_eq!(backend.name(), "stub");
        assert_eq!(backend.device(), ScoreDevice::Cpu);
    }

    #[test]
    fn test_unknown_name_lists_alternatives() {
        let dir = TempDir::new().expect("create temp dir");
        let result = create_backend("resnet-50", &config(&dir));
        match result {
            Err(BackendError::UnknownBackend { name, available }) => {
                assert_eq!(name, "resnet-50");
                assert!(available.contains("stub"));
                assert!(available.contains("laion-vit-l-14"));
            }
            other => panic!("expected UnknownBackend, got {:?}", other.map(|b| b.name().to_string())),
        }
    }

    #[test]
    fn test_clip_without_weights_is_model_not_found() {
        let dir = TempDir::new().expect("create temp dir");
        let result = create_backend("laion-vit-l-14", &config(&dir));
        assert!(matches!(result, Err(BackendError::ModelNotFound { .. })));
    }
}
