//! Property tests for the palette, hex grammar and state registry.

use proptest::prelude::*;
use sim_draw::{generate_palette, hex_to_rgb, is_valid_hex, StateColorMap, StateValue};

proptest! {
    #[test]
    fn test_palette_has_requested_length(n in 1usize..512) {
        let palette = generate_palette(n);
        prop_assert_eq!(palette.len(), n);
        prop_assert!(palette.iter().all(|c| c.a == 255));
    }

    #[test]
    fn test_palette_is_deterministic(n in 1usize..256) {
        prop_assert_eq!(generate_palette(n), generate_palette(n));
    }

    #[test]
    fn test_short_and_long_hex_are_valid(digits in "[0-9a-fA-F]{3}|[0-9a-fA-F]{6}") {
        let hex = format!("#{}", digits);
        prop_assert!(is_valid_hex(Some(&hex)));
        prop_assert!(hex_to_rgb(&hex).is_ok());
    }

    #[test]
    fn test_other_lengths_are_invalid(digits in "[0-9a-fA-F]{0,12}") {
        prop_assume!(digits.len() != 3 && digits.len() != 6);
        let hex = format!("#{}", digits);
        prop_assert!(!is_valid_hex(Some(&hex)));
    }

    #[test]
    fn test_short_hex_doubles_digits(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
        let short = format!("#{:x}{:x}{:x}", r, g, b);
        let long = format!("#{:x}{:x}{:x}{:x}{:x}{:x}", r, r, g, g, b, b);
        prop_assert_eq!(hex_to_rgb(&short).unwrap(), hex_to_rgb(&long).unwrap());
    }

    #[test]
    fn test_index_states_follow_declaration_order(count in 1usize..40) {
        // Every state declares index 0, colors still differ by position
        let states = StateColorMap::define(
            (0..count).map(|i| (format!("s{}", i), StateValue::Index(0))),
        )
        .unwrap();
        let palette = generate_palette(count);
        for (i, entry) in states.iter().enumerate() {
            prop_assert_eq!(entry.color, palette[i]);
        }
    }

    #[test]
    fn test_out_of_range_indices_reject_the_map(count in 1usize..20, extra in 0i64..10) {
        let mut entries: Vec<(String, StateValue)> =
            (0..count).map(|i| (format!("s{}", i), StateValue::Index(0))).collect();
        entries[count - 1].1 = StateValue::Index(count as i64 + extra);
        prop_assert!(StateColorMap::define(entries).is_err());
    }
}

#[test]
fn test_none_is_not_hex() {
    assert!(!is_valid_hex(None));
    assert!(!is_valid_hex(Some("")));
    assert!(!is_valid_hex(Some("#abcdef0")));
}
