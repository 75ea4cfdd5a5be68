//! Property-based tests for the telemetry decoder.
//!
//! The decoder runs on every record the host sends, so it must accept any
//! byte sequence without panicking and must never invent values for fields
//! that were not on the line.

use dashlink_protocol::telemetry::{parse_int, DEFAULT_GEAR};
use dashlink_protocol::{TelemetryRecord, FIELD_COUNT};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary bytes never panic and never report more than 14 fields.
    #[test]
    fn prop_decode_total(line in proptest::collection::vec(any::<u8>(), 0..256)) {
        let record = TelemetryRecord::decode(&line);
        prop_assert!(record.fields_present <= FIELD_COUNT);
        let _ = record.clock();
    }

    /// Integers survive formatting and parsing unchanged.
    #[test]
    fn prop_parse_int_matches_display(value in any::<i32>()) {
        prop_assert_eq!(parse_int(&value.to_string()), value);
    }

    /// Speed and RPM are decoded as sent, and the indicator flags land in
    /// the right slots.
    #[test]
    fn prop_wire_values_decode(
        speed in 0i32..400,
        rpm in 0i32..20000,
        right in 0i32..=1,
        left in 0i32..=1,
    ) {
        let line = format!(
            "90,{speed},{rpm},50,90,4,1/1/2025 01:02:03 AM,10,0,7000,0,3,{right},{left}\n"
        );
        let record = TelemetryRecord::decode(line.as_bytes());
        prop_assert!(record.is_complete());
        prop_assert_eq!(record.speed, speed);
        prop_assert_eq!(record.rpm, rpm);
        prop_assert_eq!(record.right_indicator, right);
        prop_assert_eq!(record.left_indicator, left);
    }

    /// Cutting a valid line at any separator keeps the prefix and defaults
    /// the rest.
    #[test]
    fn prop_truncation_defaults_tail(cut in 1usize..14) {
        let full = "90,55,4000,50,90,4,1/1/2025 01:02:03 AM,10,0,7000,0,3,1,1";
        let prefix: Vec<&str> = full.split(',').take(cut).collect();
        let record = TelemetryRecord::decode(prefix.join(",").as_bytes());

        prop_assert_eq!(record.fields_present as usize, cut);
        prop_assert_eq!(record.left_indicator, 0);
        if cut < 6 {
            prop_assert_eq!(record.gear, DEFAULT_GEAR);
        }
        if cut < 13 {
            prop_assert_eq!(record.right_indicator, 0);
        }
    }
}
