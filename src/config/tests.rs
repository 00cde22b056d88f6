use super::*;

mod default_tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, DEFAULT_BACKEND);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.device.is_none());
        assert!(!config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_env_constants() {
        assert_eq!(Config::ENV_MODEL_DIR, "LUMEN_MODEL_DIR");
        assert_eq!(Config::ENV_BACKEND, "LUMEN_BACKEND");
        assert_eq!(Config::ENV_BATCH_SIZE, "LUMEN_BATCH_SIZE");
        assert_eq!(Config::ENV_DEVICE, "LUMEN_DEVICE");
    }
}

mod env_tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        unsafe {
            env::remove_var(Config::ENV_MODEL_DIR);
            env::remove_var(Config::ENV_BACKEND);
            env::remove_var(Config::ENV_BATCH_SIZE);
            env::remove_var(Config::ENV_DEVICE);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_empty_uses_defaults() {
        clear_env();

        let config = Config::from_env().expect("parse empty env");
        assert_eq!(config.backend, DEFAULT_BACKEND);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.device.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var(Config::ENV_MODEL_DIR, "/opt/models");
            env::set_var(Config::ENV_BACKEND, "laion-vit-b-32");
            env::set_var(Config::ENV_BATCH_SIZE, "8");
            env::set_var(Config::ENV_DEVICE, "cpu");
        }

        let config = Config::from_env().expect("parse env");
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.backend, "laion-vit-b-32");
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.device, Some(ScoreDevice::Cpu));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_batch_size() {
        clear_env();
        unsafe {
            env::set_var(Config::ENV_BATCH_SIZE, "0");
        }

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidBatchSize { .. })));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unparseable_batch_size() {
        clear_env();
        unsafe {
            env::set_var(Config::ENV_BATCH_SIZE, "many");
        }

        let result = Config::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::BatchSizeParseError { .. })
        ));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_device_variants() {
        clear_env();

        let cases = [
            ("auto", None),
            ("cpu", Some(ScoreDevice::Cpu)),
            ("CPU", Some(ScoreDevice::Cpu)),
            ("cuda", Some(ScoreDevice::Cuda(0))),
            ("cuda:1", Some(ScoreDevice::Cuda(1))),
            ("metal", Some(ScoreDevice::Metal(0))),
            ("metal:0", Some(ScoreDevice::Metal(0))),
        ];

        for (value, expected) in cases {
            unsafe {
                env::set_var(Config::ENV_DEVICE, value);
            }
            let config = Config::from_env().expect("parse env");
            assert_eq!(config.device, expected, "device '{value}'");
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_device() {
        clear_env();
        unsafe {
            env::set_var(Config::ENV_DEVICE, "tpu");
        }

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidDevice { .. })));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_whitespace_device_is_auto() {
        clear_env();
        unsafe {
            env::set_var(Config::ENV_DEVICE, "  ");
        }

        let config = Config::from_env().expect("parse env");
        assert!(config.device.is_none());

        clear_env();
    }
}

mod parse_device_tests {
    use super::*;

    #[test]
    fn test_parse_device_accepts_known_forms() {
        assert_eq!(parse_device("auto").expect("parse"), None);
        assert_eq!(parse_device("cpu").expect("parse"), Some(ScoreDevice::Cpu));
        assert_eq!(
            parse_device("cuda:2").expect("parse"),
            Some(ScoreDevice::Cuda(2))
        );
        assert_eq!(
            parse_device(" Metal:1 ").expect("parse"),
            Some(ScoreDevice::Metal(1))
        );
    }

    #[test]
    fn test_parse_device_rejects_garbage() {
        assert!(parse_device("tpu").is_err());
        assert!(parse_device("cuda:x").is_err());
        assert!(parse_device("cpu:1").is_err());
    }
}

mod validate_tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_validate_default_is_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config = Config {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBatchSize { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_file_as_model_dir() {
        let dir = TempDir::new().expect("create temp dir");
        let file = dir.path().join("weights.bin");
        File::create(&file).expect("create file");

        let config = Config {
            model_dir: file,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_nonexistent_model_dir() {
        // The directory may be created later by a setup step; only an
        // existing non-directory is a configuration error.
        let config = Config {
            model_dir: PathBuf::from("/definitely/not/created/yet"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
