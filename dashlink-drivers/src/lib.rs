//! Peripheral adapter implementations
//!
//! This crate provides concrete implementations of the adapter traits
//! defined in dashlink-core, built on `embedded-hal` pins:
//!
//! - Turn indicator lamps on two GPIOs
//! - Single-digit gear display behind a 74HC595 shift register
//! - Lamp-only instrument cluster that latches gauge values

#![no_std]
#![deny(unsafe_code)]

pub mod cluster;
pub mod gear;
pub mod indicator;

pub use cluster::{ClusterState, LampCluster, StateSink};
pub use gear::{segments_for, Hc595GearDisplay, SegmentPolarity, ShiftError};
pub use indicator::GpioIndicators;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod mock {
    use core::convert::Infallible;
    use std::vec::Vec;

    use embedded_hal::digital::{ErrorType, OutputPin};

    /// Pin that records every level it was driven to
    #[derive(Debug, Default)]
    pub struct MockPin {
        pub levels: Vec<bool>,
    }

    impl MockPin {
        pub fn is_high(&self) -> bool {
            self.levels.last().copied().unwrap_or(false)
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.push(true);
            Ok(())
        }
    }
}
