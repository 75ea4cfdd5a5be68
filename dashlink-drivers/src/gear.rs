//! 74HC595 gear display
//!
//! A single seven-segment digit behind a 74HC595 shift register, driven by
//! bit-banging three pins. Segment bits are `a` = bit 0 through `g` = bit 6
//! with the decimal point on bit 7.
//!
//! ```text
//!  data  ──►┌─────────┐ Q0..Q7
//!  clock ──►│ 74HC595 ├────────► segments a..g, dp
//!  latch ──►└─────────┘
//! ```

use dashlink_core::traits::GearDisplay;
use embedded_hal::digital::OutputPin;

/// How a lit segment is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPolarity {
    /// Common cathode: 1 lights the segment
    #[default]
    CommonCathode,
    /// Common anode: 0 lights the segment
    CommonAnode,
}

/// Segment pattern for a gear character, blank if unknown
pub const fn segments_for(gear: char) -> u8 {
    match gear {
        '0' => 0x3F,
        '1' => 0x06,
        '2' => 0x5B,
        '3' => 0x4F,
        '4' => 0x66,
        '5' => 0x6D,
        '6' => 0x7D,
        '7' => 0x07,
        '8' => 0x7F,
        '9' => 0x6F,
        'R' | 'r' => 0x50,
        'N' | 'n' => 0x54,
        'P' | 'p' => 0x73,
        '-' => 0x40,
        _ => 0x00,
    }
}

pub struct Hc595GearDisplay<D, C, L> {
    data: D,
    clock: C,
    latch: L,
    polarity: SegmentPolarity,
    current: Option<char>,
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> Hc595GearDisplay<D, C, L> {
    pub fn new(data: D, clock: C, latch: L, polarity: SegmentPolarity) -> Self {
        Self {
            data,
            clock,
            latch,
            polarity,
            current: None,
        }
    }

    /// Last character shown
    pub fn current(&self) -> Option<char> {
        self.current
    }

    /// Shift one byte out MSB first and latch it
    pub fn shift_out(&mut self, byte: u8) -> Result<(), ShiftError> {
        self.latch.set_low().map_err(|_| ShiftError)?;
        for bit in (0..8).rev() {
            if byte & (1 << bit) != 0 {
                self.data.set_high().map_err(|_| ShiftError)?;
            } else {
                self.data.set_low().map_err(|_| ShiftError)?;
            }
            self.clock.set_high().map_err(|_| ShiftError)?;
            self.clock.set_low().map_err(|_| ShiftError)?;
        }
        self.latch.set_high().map_err(|_| ShiftError)?;
        Ok(())
    }

    fn pattern(&self, gear: char) -> u8 {
        let segments = segments_for(gear);
        match self.polarity {
            SegmentPolarity::CommonCathode => segments,
            SegmentPolarity::CommonAnode => !segments,
        }
    }
}

/// A pin refused a level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftError;

impl<D: OutputPin, C: OutputPin, L: OutputPin> GearDisplay for Hc595GearDisplay<D, C, L> {
    fn set_gear(&mut self, gear: char) {
        if self.current == Some(gear) {
            return;
        }
        let pattern = self.pattern(gear);
        if self.shift_out(pattern).is_ok() {
            self.current = Some(gear);
        }
    }
}
