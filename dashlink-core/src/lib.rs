//! Board-agnostic core logic for the dashboard firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Peripheral adapter traits (cluster, segment banks, matrices, strips)
//! - Build-time configuration types and the module registry
//! - Turn indicator debouncing and blink scheduling
//! - Odometer persistence discipline
//! - The command dispatcher that ties the host link to the adapters

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod odometer;
pub mod registry;
pub mod signal;
pub mod traits;

pub use config::DeviceConfig;
pub use dispatch::{CommandError, Device, Peripherals, Served};
pub use registry::{ModuleRegistry, PeripheralKind};

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod testing;
