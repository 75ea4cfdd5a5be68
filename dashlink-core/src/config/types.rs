//! Configuration type definitions
//!
//! Every field is known at build time, so the types hold `&'static str`
//! and plain integers and can be built in a `const` context.

use dashlink_protocol::FeatureSet;

use crate::registry::PeripheralKind;

/// Maximum modules per segment or matrix kind
pub const MAX_SEGMENT_MODULES: u8 = 8;

/// Maximum LED matrix modules
pub const MAX_MATRIX_MODULES: u8 = 8;

/// Maximum addressable RGB LEDs
pub const MAX_RGB_LEDS: u8 = 128;

/// Pixel count of a fitted RGB matrix
pub const RGB_MATRIX_PIXELS: u8 = 64;

/// Maximum device name length reported to the host
pub const MAX_NAME_LEN: usize = 32;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Module count exceeds the hardware limit for this kind
    TooManyModules(PeripheralKind),
    /// Device name is empty or too long
    InvalidName,
    /// Debounce threshold must be at least 1
    ZeroDebounceThreshold,
    /// Blink interval must be at least 1 ms
    ZeroBlinkInterval,
    /// Read timeout must be at least 1 ms
    ZeroReadTimeout,
    /// Odometer persist delta must be at least 1
    ZeroPersistDelta,
}

/// Identity reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// Name returned by the device-name query
    pub name: &'static str,
    /// Unique id string returned by the unique-id query
    pub unique_id: &'static str,
    /// Protocol version character returned by hello
    pub version: u8,
    /// Three signature bytes returned by the `mcutype` expanded command
    pub mcu_signature: [u8; 3],
}

impl Identity {
    pub const DEFAULT: Self = Self {
        name: "dashlink",
        unique_id: "0000000000000000",
        version: b'j',
        mcu_signature: [0x1E, 0x95, 0x0F],
    };
}

impl Default for Identity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Installed module counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleCounts {
    pub buttons: u8,
    pub tm1638: u8,
    pub seven_segment: u8,
    pub led_matrix: u8,
    pub rgb_leds: u8,
    /// Either 0 or 64
    pub rgb_matrix_pixels: u8,
    pub encoders: u8,
}

impl ModuleCounts {
    /// Nothing fitted besides the instrument cluster
    pub const NONE: Self = Self {
        buttons: 0,
        tm1638: 0,
        seven_segment: 0,
        led_matrix: 0,
        rgb_leds: 0,
        rgb_matrix_pixels: 0,
        encoders: 0,
    };
}

impl Default for ModuleCounts {
    fn default() -> Self {
        Self::NONE
    }
}

/// Timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Bounded wait for each payload byte (ms)
    pub read_timeout_ms: u32,
    /// How long `service` waits for a header before returning (ms)
    pub idle_poll_ms: u32,
    /// Indicator blink half-period (ms)
    pub blink_interval_ms: u32,
    /// Consecutive zero samples before an indicator goes inactive
    pub debounce_threshold: u32,
    /// Minimum gap between cluster refreshes (ms), 0 refreshes every tick
    pub cluster_refresh_ms: u32,
}

impl TimingConfig {
    pub const DEFAULT: Self = Self {
        read_timeout_ms: 200,
        idle_poll_ms: 5,
        blink_interval_ms: 500,
        debounce_threshold: 5,
        cluster_refresh_ms: 0,
    };
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Odometer persistence parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OdometerConfig {
    /// Minimum advance before a new value is written to flash
    pub persist_delta: u32,
}

impl OdometerConfig {
    pub const DEFAULT: Self = Self { persist_delta: 10 };
}

impl Default for OdometerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub identity: Identity,
    pub modules: ModuleCounts,
    pub timing: TimingConfig,
    pub odometer: OdometerConfig,
    /// Extra capabilities not implied by the module counts
    pub features: FeatureSet,
}

impl DeviceConfig {
    pub const DEFAULT: Self = Self {
        identity: Identity::DEFAULT,
        modules: ModuleCounts::NONE,
        timing: TimingConfig::DEFAULT,
        odometer: OdometerConfig::DEFAULT,
        features: FeatureSet {
            led_matrix: false,
            character_lcd: false,
            graphic_lcd: false,
            rgb_matrix: false,
            motors: false,
        },
    };

    /// Check hardware limits and timing sanity
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.modules;
        let limits = [
            (PeripheralKind::Tm1638, m.tm1638, MAX_SEGMENT_MODULES),
            (PeripheralKind::SevenSegment, m.seven_segment, MAX_SEGMENT_MODULES),
            (PeripheralKind::LedMatrix, m.led_matrix, MAX_MATRIX_MODULES),
            (PeripheralKind::RgbLeds, m.rgb_leds, MAX_RGB_LEDS),
        ];
        for (kind, count, max) in limits {
            if count > max {
                return Err(ConfigError::TooManyModules(kind));
            }
        }
        if m.rgb_matrix_pixels != 0 && m.rgb_matrix_pixels != RGB_MATRIX_PIXELS {
            return Err(ConfigError::TooManyModules(PeripheralKind::RgbMatrix));
        }

        let name = self.identity.name;
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(ConfigError::InvalidName);
        }

        let t = &self.timing;
        if t.debounce_threshold == 0 {
            return Err(ConfigError::ZeroDebounceThreshold);
        }
        if t.blink_interval_ms == 0 {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        if t.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        if self.odometer.persist_delta == 0 {
            return Err(ConfigError::ZeroPersistDelta);
        }
        Ok(())
    }

    /// Feature set advertised to the host
    ///
    /// Matrix flags follow the module counts, the rest come from `features`.
    pub fn feature_set(&self) -> FeatureSet {
        FeatureSet {
            led_matrix: self.features.led_matrix || self.modules.led_matrix > 0,
            rgb_matrix: self.features.rgb_matrix || self.modules.rgb_matrix_pixels > 0,
            ..self.features
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(DeviceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_too_many_tm1638() {
        let mut config = DeviceConfig::default();
        config.modules.tm1638 = 9;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyModules(PeripheralKind::Tm1638))
        );
    }

    #[test]
    fn test_rejects_too_many_rgb_leds() {
        let mut config = DeviceConfig::default();
        config.modules.rgb_leds = 129;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyModules(PeripheralKind::RgbLeds))
        );
    }

    #[test]
    fn test_rgb_matrix_is_all_or_nothing() {
        let mut config = DeviceConfig::default();
        config.modules.rgb_matrix_pixels = 32;
        assert!(config.validate().is_err());
        config.modules.rgb_matrix_pixels = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_timing() {
        let mut config = DeviceConfig::default();
        config.timing.debounce_threshold = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDebounceThreshold));

        let mut config = DeviceConfig::default();
        config.timing.blink_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBlinkInterval));

        let mut config = DeviceConfig::default();
        config.odometer.persist_delta = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPersistDelta));
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut config = DeviceConfig::default();
        config.identity.name = "";
        assert_eq!(config.validate(), Err(ConfigError::InvalidName));
    }

    #[test]
    fn test_feature_set_follows_modules() {
        let mut config = DeviceConfig::default();
        assert_eq!(config.feature_set().encode().as_str(), "GNJPX\n");

        config.modules.led_matrix = 2;
        config.modules.rgb_matrix_pixels = 64;
        config.features.character_lcd = true;
        assert_eq!(config.feature_set().encode().as_str(), "MLGNJPXR\n");
    }
}
