//! dashlink Hardware Abstraction Layer
//!
//! Traits implemented by chip-specific HALs so the protocol engine can run
//! unchanged on the target and on the host test harness.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  dashlink-core / dashlink-protocol      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dashlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ dashlink-hal-   │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::LinkRx`], [`link::LinkTx`] - Host serial link with bounded waits
//! - [`clock::Clock`] - Monotonic millisecond time source
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod flash;
pub mod link;

pub use clock::Clock;
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use link::{Link, LinkError, LinkRx, LinkTx};
