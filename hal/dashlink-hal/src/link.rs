//! Host serial link abstractions
//!
//! The host link is half-duplex request/response. Every receive carries an
//! explicit upper bound on how long it may wait, so a stalled host can never
//! wedge the device.

use core::future::Future;

/// Errors reported by a link implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No byte arrived within the allowed wait
    Timeout,
    /// Receive buffer overrun, bytes were lost
    Overrun,
    /// Framing, parity or break condition on the wire
    Line,
    /// Transmit failed
    Write,
}

/// Receive side of the host link
pub trait LinkRx {
    /// Read a single byte, waiting at most `timeout_ms` milliseconds
    ///
    /// Returns [`LinkError::Timeout`] if nothing arrived in time.
    fn read_byte_within(
        &mut self,
        timeout_ms: u32,
    ) -> impl Future<Output = Result<u8, LinkError>>;
}

/// Transmit side of the host link
pub trait LinkTx {
    /// Queue bytes for transmission
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), LinkError>>;

    /// Wait until all queued bytes have left the device
    fn flush(&mut self) -> impl Future<Output = Result<(), LinkError>>;
}

/// Combined link for transports that own both directions
pub trait Link: LinkRx + LinkTx {}

// Blanket implementation
impl<T: LinkRx + LinkTx> Link for T {}
