//! Module registry
//!
//! Static counts of installed peripheral modules. The host queries these
//! counts and sizes its data frames from them, so the dispatcher reads
//! exactly `count_of(kind)` chunks for every per-module command.

use crate::config::ModuleCounts;

/// Kind of peripheral module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralKind {
    Buttons,
    Tm1638,
    SevenSegment,
    LedMatrix,
    RgbLeds,
    RgbMatrix,
    Encoders,
}

impl PeripheralKind {
    pub const ALL: [PeripheralKind; 7] = [
        PeripheralKind::Buttons,
        PeripheralKind::Tm1638,
        PeripheralKind::SevenSegment,
        PeripheralKind::LedMatrix,
        PeripheralKind::RgbLeds,
        PeripheralKind::RgbMatrix,
        PeripheralKind::Encoders,
    ];

    /// Payload bytes per unit in the matching data command, 0 if the kind
    /// has no data command
    pub const fn chunk_len(self) -> usize {
        match self {
            PeripheralKind::Tm1638 => 10,
            PeripheralKind::SevenSegment => 9,
            PeripheralKind::LedMatrix => 9,
            PeripheralKind::RgbLeds | PeripheralKind::RgbMatrix => 3,
            PeripheralKind::Buttons | PeripheralKind::Encoders => 0,
        }
    }
}

/// Read-only view over the configured module counts
#[derive(Debug, Clone, Copy)]
pub struct ModuleRegistry {
    counts: ModuleCounts,
}

impl ModuleRegistry {
    pub const fn new(counts: ModuleCounts) -> Self {
        Self { counts }
    }

    /// Installed units of `kind`
    ///
    /// For the RGB matrix this is the pixel count.
    pub const fn count_of(&self, kind: PeripheralKind) -> u8 {
        let c = &self.counts;
        match kind {
            PeripheralKind::Buttons => c.buttons,
            PeripheralKind::Tm1638 => c.tm1638,
            PeripheralKind::SevenSegment => c.seven_segment,
            PeripheralKind::LedMatrix => c.led_matrix,
            PeripheralKind::RgbLeds => c.rgb_leds,
            PeripheralKind::RgbMatrix => c.rgb_matrix_pixels,
            PeripheralKind::Encoders => c.encoders,
        }
    }

    /// Total payload length of the data command for `kind`
    pub const fn payload_len(&self, kind: PeripheralKind) -> usize {
        self.count_of(kind) as usize * kind.chunk_len()
    }
}
