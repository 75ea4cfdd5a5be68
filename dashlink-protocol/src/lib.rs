//! Host Link Protocol
//!
//! This crate defines the byte-oriented protocol between the telemetry host
//! (a PC application) and the dashboard microcontroller. One serial link
//! multiplexes every peripheral on the device.
//!
//! # Protocol Overview
//!
//! The host always speaks first. Each command is a header byte followed by
//! a single opcode byte and an opcode-specific payload:
//! ```text
//! ┌────────┬────────┬──────────────────────────────┐
//! │ HEADER │ OPCODE │ PAYLOAD (opcode specific)    │
//! │ 0x03   │ 1B     │ 0..N bytes / ASCII line      │
//! └────────┴────────┴──────────────────────────────┘
//! ```
//!
//! Query opcodes are answered with a short fixed response. Data opcodes
//! carry either one chunk per installed module (the host learns the module
//! counts through the query opcodes first) or one ASCII telemetry line.

#![no_std]
#![deny(unsafe_code)]

pub mod features;
pub mod opcode;
pub mod session;
pub mod telemetry;

pub use features::{FeatureSet, FEATURE_STRING_CAPACITY};
pub use opcode::{Opcode, ACQ_REPLY, DATA_ACK, MESSAGE_HEADER, SHUTDOWN_REPLY};
pub use session::{ReadError, Session};
pub use telemetry::{ClockTime, Meridiem, TelemetryRecord, FIELD_COUNT, FIELD_SEPARATOR};

#[cfg(test)]
extern crate std;
