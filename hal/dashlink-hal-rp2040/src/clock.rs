//! Millisecond clock from the embassy time driver

use dashlink_hal::Clock;
use embassy_time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping counter the core expects
        Instant::now().as_millis() as u32
    }
}
