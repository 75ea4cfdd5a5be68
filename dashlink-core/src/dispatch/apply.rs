//! Telemetry application

use dashlink_hal::{Clock, FlashStorage, Link};
use dashlink_protocol::TelemetryRecord;

use super::Device;
use crate::traits::Side;

/// Shift-light RPM that maps to full brightness
const SHIFT_RPM_FULL_SCALE: i32 = 8000;
const BRIGHTNESS_MIN: i32 = 50;
const BRIGHTNESS_MAX: i32 = 256;

/// Integer linear map with truncating division
///
/// Values outside the input range extrapolate. A degenerate input range
/// maps everything to `out_min`.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    let span = in_max as i64 - in_min as i64;
    if span == 0 {
        return out_min;
    }
    let scaled =
        (value as i64 - in_min as i64) * (out_max as i64 - out_min as i64) / span + out_min as i64;
    scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Backlight level for a shift-light RPM value
pub fn brightness_for_shift_rpm(rpm: i32) -> i32 {
    map_range(rpm, 0, SHIFT_RPM_FULL_SCALE, BRIGHTNESS_MIN, BRIGHTNESS_MAX)
}

impl<'a, L: Link, S: FlashStorage, C: Clock> Device<'a, L, S, C> {
    /// Push one decoded record to the indicators, the cluster and the
    /// odometer tracker
    ///
    /// Brake and opponent count have no cluster output.
    pub(super) fn apply_telemetry(&mut self, record: &TelemetryRecord) {
        let now = self.clock.now_ms();
        let cluster = &mut *self.peripherals.cluster;

        cluster.set_time(record.clock());

        self.indicators.observe(Side::Left, record.left_indicator, now);
        self.indicators.observe(Side::Right, record.right_indicator, now);

        // The outdoor gauge has no telemetry source of its own
        cluster.set_outdoor_temp(record.oil_temp);
        cluster.set_coolant_temp(record.coolant_temp);
        cluster.set_speed(record.speed);
        cluster.set_fuel_level(record.fuel_percent);
        cluster.set_rpm(record.rpm);
        cluster.set_gear(record.gear);

        let distance = u32::try_from(record.odometer).unwrap_or(0);
        cluster.set_odometer(distance);
        self.pending_odometer = self.odometer.observe(distance);

        cluster.set_chime(record.volume > 0);
        cluster.set_brightness(brightness_for_shift_rpm(record.shift_light_rpm));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_endpoints() {
        assert_eq!(brightness_for_shift_rpm(0), 50);
        assert_eq!(brightness_for_shift_rpm(8000), 256);
        assert_eq!(brightness_for_shift_rpm(7000), 230);
        assert_eq!(brightness_for_shift_rpm(4000), 153);
    }

    #[test]
    fn test_map_range_truncates_toward_zero() {
        // 1 * 206 / 8000 = 0.02575
        assert_eq!(map_range(1, 0, 8000, 50, 256), 50);
        // -100 * 206 / 8000 = -2.575, truncated to -2
        assert_eq!(map_range(-100, 0, 8000, 50, 256), 48);
    }

    #[test]
    fn test_map_range_extremes_do_not_overflow() {
        assert_eq!(map_range(i32::MAX, 0, 1, 0, i32::MAX), i32::MAX);
        assert_eq!(map_range(5, 3, 3, 7, 9), 7);
    }
}
