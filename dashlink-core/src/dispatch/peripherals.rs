//! Adapter set handed to the dispatcher

use crate::traits::{GearDisplay, InstrumentCluster, LedMatrix, RgbStrip, SegmentBank};

/// Borrowed output adapters
///
/// The instrument cluster is always present. Every other slot is optional;
/// data for an empty slot is still read off the wire and then dropped.
pub struct Peripherals<'a> {
    pub cluster: &'a mut dyn InstrumentCluster,
    pub tm1638: Option<&'a mut dyn SegmentBank>,
    pub seven_segment: Option<&'a mut dyn SegmentBank>,
    pub led_matrix: Option<&'a mut dyn LedMatrix>,
    pub rgb_leds: Option<&'a mut dyn RgbStrip>,
    pub rgb_matrix: Option<&'a mut dyn RgbStrip>,
    pub gear: Option<&'a mut dyn GearDisplay>,
}

impl<'a> Peripherals<'a> {
    pub fn new(cluster: &'a mut dyn InstrumentCluster) -> Self {
        Self {
            cluster,
            tm1638: None,
            seven_segment: None,
            led_matrix: None,
            rgb_leds: None,
            rgb_matrix: None,
            gear: None,
        }
    }

    pub fn with_tm1638(mut self, bank: &'a mut dyn SegmentBank) -> Self {
        self.tm1638 = Some(bank);
        self
    }

    pub fn with_seven_segment(mut self, bank: &'a mut dyn SegmentBank) -> Self {
        self.seven_segment = Some(bank);
        self
    }

    pub fn with_led_matrix(mut self, matrix: &'a mut dyn LedMatrix) -> Self {
        self.led_matrix = Some(matrix);
        self
    }

    pub fn with_rgb_leds(mut self, strip: &'a mut dyn RgbStrip) -> Self {
        self.rgb_leds = Some(strip);
        self
    }

    pub fn with_rgb_matrix(mut self, matrix: &'a mut dyn RgbStrip) -> Self {
        self.rgb_matrix = Some(matrix);
        self
    }

    pub fn with_gear(mut self, gear: &'a mut dyn GearDisplay) -> Self {
        self.gear = Some(gear);
        self
    }
}
