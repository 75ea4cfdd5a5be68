//! Build-time device configuration
//!
//! `build.rs` validates `device.toml` and writes `DEVICE_CONFIG` into
//! OUT_DIR; this module pulls it in with the types it names.

use dashlink_core::config::{DeviceConfig, Identity, ModuleCounts, OdometerConfig, TimingConfig};
use dashlink_protocol::FeatureSet;

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));
