//! Configuration types
//!
//! Board-agnostic configuration fixed at build time. The firmware's build
//! script validates `device.toml` and generates a `DeviceConfig` constant.

pub mod types;

pub use types::*;
