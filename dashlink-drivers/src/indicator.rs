//! GPIO turn indicator lamps
//!
//! Two lamps, each on its own pin (directly or via a transistor). The pins
//! can be active-high (default) or active-low.

use dashlink_core::traits::{IndicatorOutput, Side};
use embedded_hal::digital::OutputPin;

pub struct GpioIndicators<L, R> {
    left: L,
    right: R,
    /// If true, lamp ON = pin LOW
    inverted: bool,
    state: [bool; 2],
}

impl<L: OutputPin, R: OutputPin> GpioIndicators<L, R> {
    /// Create the lamp pair, both lamps off
    pub fn new(left: L, right: R, inverted: bool) -> Self {
        let mut lamps = Self {
            left,
            right,
            inverted,
            state: [false; 2],
        };
        lamps.set_indicator(Side::Left, false);
        lamps.set_indicator(Side::Right, false);
        lamps
    }

    pub fn new_active_high(left: L, right: R) -> Self {
        Self::new(left, right, false)
    }

    pub fn new_active_low(left: L, right: R) -> Self {
        Self::new(left, right, true)
    }

    /// Logical lamp state
    pub fn is_on(&self, side: Side) -> bool {
        self.state[side as usize]
    }
}

impl<L: OutputPin, R: OutputPin> IndicatorOutput for GpioIndicators<L, R> {
    fn set_indicator(&mut self, side: Side, on: bool) {
        self.state[side as usize] = on;
        let high = on != self.inverted;
        // Pin errors are infallible on the supported targets
        match side {
            Side::Left => {
                let _ = drive(&mut self.left, high);
            }
            Side::Right => {
                let _ = drive(&mut self.right, high);
            }
        }
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}
