mod tests {
    use strip_dimmer::MAX_LEVEL;
    use strip_dimmer::PwmResolution;
    use strip_dimmer::correction::{correct8, correct10, rescale};

    #[test]
    fn test_correct8_fixed_points() {
        assert_eq!(correct8(0), 0);
        assert_eq!(correct8(255), 255);
        assert_eq!(correct8(1), 1);
        assert_eq!(correct8(127), 33);
    }

    #[test]
    fn test_correct10_fixed_points() {
        assert_eq!(correct10(0), 0);
        assert_eq!(correct10(1023), 1023);
        assert_eq!(correct10(512), 129);
    }

    #[test]
    fn test_correction_is_monotonic_and_bounded() {
        for resolution in [PwmResolution::Bits8, PwmResolution::Bits10] {
            let mut previous = 0;
            for level in 0..=MAX_LEVEL {
                let duty = resolution.output(level);
                assert!(duty >= previous, "{resolution:?} drops at {level}");
                assert!(duty <= resolution.max_duty());
                previous = duty;
            }
            assert_eq!(resolution.output(0), 0);
            assert_eq!(resolution.output(MAX_LEVEL), resolution.max_duty());
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(correct8(300), 255);
        assert_eq!(correct10(5000), 1023);
        assert_eq!(PwmResolution::Bits8.output(u16::MAX), 255);
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(0, 255), 0);
        assert_eq!(rescale(512, 255), 127);
        assert_eq!(rescale(1023, 255), 255);
        assert_eq!(rescale(1023, 225), 225);
        assert_eq!(PwmResolution::Bits10.rescale(700), 700);
    }

    #[test]
    fn test_resolution_constants() {
        assert_eq!(PwmResolution::Bits8.carrier_hz(), 62_500);
        assert_eq!(PwmResolution::Bits10.carrier_hz(), 15_625);
        assert_eq!(PwmResolution::Bits8.tracking_ceiling(), 225);
        assert_eq!(PwmResolution::Bits10.tracking_ceiling(), 1023);
    }
}
