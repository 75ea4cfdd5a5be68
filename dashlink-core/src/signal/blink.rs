//! Blink scheduler

use super::debounce::{ChannelState, Transition};
use crate::traits::{IndicatorOutput, Side};

impl ChannelState {
    /// Advance the blink phase to `now_ms` and return the lamp state
    ///
    /// Elapsed time uses wrapping subtraction so the millisecond counter
    /// may roll over.
    pub fn advance(&mut self, now_ms: u32, interval_ms: u32) -> bool {
        if self.active {
            if now_ms.wrapping_sub(self.last_toggle_ms) >= interval_ms {
                self.output = !self.output;
                self.last_toggle_ms = now_ms;
            }
        } else {
            self.output = false;
        }
        self.output
    }
}

/// Left and right indicator channels
#[derive(Debug, Clone, Copy)]
pub struct Indicators {
    left: ChannelState,
    right: ChannelState,
    threshold: u32,
    interval_ms: u32,
}

impl Indicators {
    pub const fn new(threshold: u32, interval_ms: u32) -> Self {
        Self {
            left: ChannelState::new(),
            right: ChannelState::new(),
            threshold,
            interval_ms,
        }
    }

    /// Feed a raw telemetry flag, any non-zero value counts as on
    pub fn observe(&mut self, side: Side, sample: i32, now_ms: u32) -> Transition {
        let threshold = self.threshold;
        self.channel_mut(side).observe(sample != 0, threshold, now_ms)
    }

    /// Advance both channels and push their outputs
    pub fn tick<O: IndicatorOutput + ?Sized>(&mut self, now_ms: u32, out: &mut O) {
        let left = self.left.advance(now_ms, self.interval_ms);
        let right = self.right.advance(now_ms, self.interval_ms);
        out.set_indicator(Side::Left, left);
        out.set_indicator(Side::Right, right);
    }

    pub fn channel(&self, side: Side) -> &ChannelState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn channel_mut(&mut self, side: Side) -> &mut ChannelState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
