//! Silent window properties over a whole day

use cifra_core::silent::{is_in_silent_period, SilentHours, ZeroWidthPolicy};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_window_length(start in 0u8..24, end in 0u8..24) {
        let silent = (0..24).filter(|&h| is_in_silent_period(h, start, end)).count();
        let expected = (usize::from(end) + 24 - usize::from(start)) % 24;
        prop_assert_eq!(silent, expected);
    }

    #[test]
    fn test_start_included_end_excluded(start in 0u8..24, end in 0u8..24) {
        prop_assume!(start != end);
        prop_assert!(is_in_silent_period(start, start, end));
        prop_assert!(!is_in_silent_period(end, start, end));
    }

    #[test]
    fn test_zero_width_policies(hour in 0u8..24, bound in 0u8..24) {
        let never = SilentHours::new(bound, bound).unwrap();
        let always = never.with_zero_width(ZeroWidthPolicy::AlwaysSilent);
        prop_assert!(!never.contains(hour));
        prop_assert!(always.contains(hour));
    }
}

#[test]
fn test_out_of_range_hours_rejected() {
    assert!(SilentHours::new(24, 6).is_err());
    assert!(SilentHours::new(6, 24).is_err());
}
