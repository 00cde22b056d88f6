use super::*;

mod normalizer_tests {
    use super::*;

    #[test]
    fn test_normalize_shifts_then_clamps() {
        assert_eq!(normalize_raw_score(-10.0), 1.0);
        assert_eq!(normalize_raw_score(0.0), 5.0);
        assert_eq!(normalize_raw_score(10.0), 10.0);
    }

    #[test]
    fn test_normalize_identity_inside_bounds() {
        assert_eq!(normalize_raw_score(-3.5), 1.5);
        assert_eq!(normalize_raw_score(1.25), 6.25);
        assert_eq!(normalize_raw_score(4.99), 9.99);
    }

    #[test]
    fn test_normalize_saturates_at_floor_and_ceiling() {
        assert_eq!(normalize_raw_score(-1_000.0), SCORE_FLOOR);
        assert_eq!(normalize_raw_score(1_000.0), SCORE_CEILING);
        assert_eq!(normalize_raw_score(f32::MIN), SCORE_FLOOR);
        assert_eq!(normalize_raw_score(f32::MAX), SCORE_CEILING);
    }

    #[test]
    fn test_normalize_never_produces_sentinel() {
        // The sentinel must stay reserved for failures, so even the most
        // negative raw input lands on the floor, not 0.0.
        for step in -200..=200 {
            let raw = step as f32 * 0.5;
            let normalized = normalize_raw_score(raw);
            assert!(
                (SCORE_FLOOR..=SCORE_CEILING).contains(&normalized),
                "raw {} normalized to out-of-range {}",
                raw,
                normalized
            );
            assert_ne!(normalized, SCORE_FAILED);
        }
    }
}

mod scored_image_tests {
    use super::*;

    #[test]
    fn test_is_failure_only_for_sentinel() {
        assert!(ScoredImage::new("a.jpg", SCORE_FAILED).is_failure());
        assert!(!ScoredImage::new("a.jpg", SCORE_FLOOR).is_failure());
        assert!(!ScoredImage::new("a.jpg", 5.0).is_failure());
    }

    #[test]
    fn test_display_scored() {
        let entry = ScoredImage::new("photos/a.jpg", 7.25);
        assert_eq!(entry.to_string(), "photos/a.jpg: 7.25");
    }

    #[test]
    fn test_display_failure() {
        let entry = ScoredImage::new("photos/broken.jpg", SCORE_FAILED);
        assert_eq!(entry.to_string(), "photos/broken.jpg: unscored");
    }

    #[test]
    fn test_new_accepts_path_like_inputs() {
        let from_str = ScoredImage::new("a.jpg", 5.0);
        let from_buf = ScoredImage::new(PathBuf::from("a.jpg"), 5.0);
        assert_eq!(from_str, from_buf);
    }
}
