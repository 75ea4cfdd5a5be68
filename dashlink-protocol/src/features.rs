//! Feature flag string
//!
//! The host asks which optional capabilities are fitted before it decides
//! which data opcodes to send. The answer is one ASCII letter per
//! capability, in a fixed order, terminated by a newline.

use heapless::String;

/// Longest possible feature string, including the newline
pub const FEATURE_STRING_CAPACITY: usize = 16;

// Letters, in wire order
const FLAG_LED_MATRIX: char = 'M';
const FLAG_CHARACTER_LCD: char = 'L';
const FLAG_GRAPHIC_LCD: char = 'K';
const FLAG_GEAR: char = 'G';
const FLAG_NAME: char = 'N';
const FLAG_BUTTONS: char = 'J';
const FLAG_CUSTOM_PROTOCOL: char = 'P';
const FLAG_EXPANDED: char = 'X';
const FLAG_RGB_MATRIX: char = 'R';
const FLAG_MOTORS: char = 'V';

/// Optional capabilities advertised to the host
///
/// Gear, name, buttons, custom protocol and expanded commands are always
/// advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeatureSet {
    /// Monochrome LED matrix modules are fitted
    pub led_matrix: bool,
    /// Character LCD is fitted
    pub character_lcd: bool,
    /// Graphic LCD (OLED/Nokia) is fitted
    pub graphic_lcd: bool,
    /// RGB matrix is fitted
    pub rgb_matrix: bool,
    /// Vibration motor outputs are fitted
    pub motors: bool,
}

impl FeatureSet {
    /// Encode as the wire string, newline included
    pub fn encode(&self) -> String<FEATURE_STRING_CAPACITY> {
        let mut out = String::new();
        let flags = [
            (self.led_matrix, FLAG_LED_MATRIX),
            (self.character_lcd, FLAG_CHARACTER_LCD),
            (self.graphic_lcd, FLAG_GRAPHIC_LCD),
            (true, FLAG_GEAR),
            (true, FLAG_NAME),
            (true, FLAG_BUTTONS),
            (true, FLAG_CUSTOM_PROTOCOL),
            (true, FLAG_EXPANDED),
            (self.rgb_matrix, FLAG_RGB_MATRIX),
            (self.motors, FLAG_MOTORS),
        ];
        // Capacity covers every flag plus the newline
        for (enabled, letter) in flags {
            if enabled {
                let _ = out.push(letter);
            }
        }
        let _ = out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_features() {
        assert_eq!(FeatureSet::default().encode().as_str(), "GNJPX\n");
    }

    #[test]
    fn test_all_features_in_order() {
        let all = FeatureSet {
            led_matrix: true,
            character_lcd: true,
            graphic_lcd: true,
            rgb_matrix: true,
            motors: true,
        };
        assert_eq!(all.encode().as_str(), "MLKGNJPXRV\n");
    }

    #[test]
    fn test_matrix_only() {
        let set = FeatureSet {
            led_matrix: true,
            rgb_matrix: true,
            ..Default::default()
        };
        assert_eq!(set.encode().as_str(), "MGNJPXR\n");
    }
}
