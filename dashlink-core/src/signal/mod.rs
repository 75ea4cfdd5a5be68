//! Turn indicator signal conditioning
//!
//! The host sends a raw on/off flag per indicator with every telemetry
//! record. Real indicators blink, so the raw flag toggles at the host's
//! sampling rate. The debouncer turns it into a steady "active" state and
//! the blink scheduler generates the output square wave locally.
//!
//! ```text
//!   raw samples ──► debounce ──► active ──► blink tick ──► IndicatorOutput
//! ```

pub mod blink;
pub mod debounce;

pub use blink::Indicators;
pub use debounce::{ChannelState, Transition};
