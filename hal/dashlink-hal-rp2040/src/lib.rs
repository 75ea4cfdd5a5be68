//! RP2040-specific HAL for the dashboard firmware
//!
//! This crate provides RP2040 implementations of the shared `dashlink-hal`
//! traits:
//!
//! - Host link over a buffered UART with bounded-wait reads
//! - Monotonic millisecond clock from `embassy-time`
//! - Flash storage driver (implements `dashlink_hal::FlashStorage`)

#![no_std]

pub mod clock;
pub mod flash;
pub mod uart;

pub use clock::EmbassyClock;
pub use flash::Rp2040FlashStorage;
pub use uart::UartLink;

// Re-export shared traits from dashlink-hal for convenience
pub use dashlink_hal::{FlashStorage as FlashStorageTrait, StorageKey};
