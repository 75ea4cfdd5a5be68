//! Peripheral adapter traits
//!
//! These traits define the interface between the command dispatcher and
//! the board-specific drivers for each kind of output hardware.

pub mod cluster;
pub mod modules;

pub use cluster::{IndicatorOutput, InstrumentCluster, Side};
pub use modules::{GearDisplay, LedMatrix, MatrixChunk, Rgb, RgbStrip, SegmentBank, SegmentChunk, Unfitted};
