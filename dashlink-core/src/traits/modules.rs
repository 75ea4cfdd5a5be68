//! Display module traits
//!
//! One trait per kind of per-module data command. The dispatcher buffers a
//! whole frame before calling any of these, so an adapter never sees half
//! of an update.

use dashlink_protocol::ClockTime;

use super::cluster::{IndicatorOutput, InstrumentCluster, Side};

/// One segment display module frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentChunk {
    /// Display brightness (0-7 on TM1638/MAX7219 class drivers)
    pub intensity: u8,
    /// Raw segment pattern per digit
    pub digits: [u8; 8],
    /// Discrete LED mask, zero on modules without LEDs
    pub leds: u8,
}

/// One 8x8 LED matrix frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixChunk {
    pub intensity: u8,
    /// One bit per pixel, row 0 first
    pub rows: [u8; 8],
}

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Bank of seven-segment modules (TM1638 or plain)
pub trait SegmentBank {
    fn write_module(&mut self, index: u8, chunk: &SegmentChunk);
}

/// Bank of monochrome LED matrix modules
pub trait LedMatrix {
    fn write_module(&mut self, index: u8, chunk: &MatrixChunk);
}

/// Addressable RGB LEDs, strip or matrix
pub trait RgbStrip {
    /// Latch one pixel
    fn set_pixel(&mut self, index: u8, colour: Rgb);

    /// Push latched pixels to the LEDs
    fn show(&mut self);
}

/// Standalone gear indicator
pub trait GearDisplay {
    fn set_gear(&mut self, gear: char);
}

/// Stand-in for hardware that is not fitted
///
/// Accepts and discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unfitted;

impl SegmentBank for Unfitted {
    fn write_module(&mut self, _index: u8, _chunk: &SegmentChunk) {}
}

impl LedMatrix for Unfitted {
    fn write_module(&mut self, _index: u8, _chunk: &MatrixChunk) {}
}

impl RgbStrip for Unfitted {
    fn set_pixel(&mut self, _index: u8, _colour: Rgb) {}
    fn show(&mut self) {}
}

impl GearDisplay for Unfitted {
    fn set_gear(&mut self, _gear: char) {}
}

impl IndicatorOutput for Unfitted {
    fn set_indicator(&mut self, _side: Side, _on: bool) {}
}

impl InstrumentCluster for Unfitted {
    fn set_coolant_temp(&mut self, _celsius: i32) {}
    fn set_outdoor_temp(&mut self, _celsius: i32) {}
    fn set_speed(&mut self, _mph: i32) {}
    fn set_rpm(&mut self, _rpm: i32) {}
    fn set_fuel_level(&mut self, _percent: i32) {}
    fn set_gear(&mut self, _gear: char) {}
    fn set_time(&mut self, _time: ClockTime) {}
    fn set_odometer(&mut self, _distance: u32) {}
    fn set_chime(&mut self, _enabled: bool) {}
    fn set_brightness(&mut self, _level: i32) {}
}
