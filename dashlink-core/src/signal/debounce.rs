//! Per-channel debouncer
//!
//! A channel becomes active on the first change to 1 and only goes
//! inactive after `threshold` consecutive 0 samples, so the off phase of a
//! blinking source does not drop the indicator.

/// Activity change caused by one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    None,
    Activated,
    Deactivated,
}

/// Debounce and blink state for one indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
    pub(super) last_sample: bool,
    pub(super) consecutive: u32,
    pub(super) active: bool,
    pub(super) output: bool,
    pub(super) last_toggle_ms: u32,
}

impl ChannelState {
    pub const fn new() -> Self {
        Self {
            last_sample: false,
            consecutive: 0,
            active: false,
            output: false,
            last_toggle_ms: 0,
        }
    }

    /// Feed one raw sample
    ///
    /// A threshold of 0 is treated as 1.
    pub fn observe(&mut self, sample: bool, threshold: u32, now_ms: u32) -> Transition {
        if sample == self.last_sample {
            self.consecutive = self.consecutive.saturating_add(1);
        } else {
            self.consecutive = 1;
            self.last_sample = sample;
            if sample {
                // Every rising edge restarts the blink phase
                let was_active = self.active;
                self.active = true;
                self.output = true;
                self.last_toggle_ms = now_ms;
                return if was_active {
                    Transition::None
                } else {
                    Transition::Activated
                };
            }
        }

        if !sample && self.active && self.consecutive >= threshold.max(1) {
            self.active = false;
            self.output = false;
            return Transition::Deactivated;
        }
        Transition::None
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current lamp state
    pub fn output(&self) -> bool {
        self.output
    }

    pub fn last_sample(&self) -> bool {
        self.last_sample
    }

    pub fn consecutive_samples(&self) -> u32 {
        self.consecutive
    }

    pub fn last_toggle_ms(&self) -> u32 {
        self.last_toggle_ms
    }
}
