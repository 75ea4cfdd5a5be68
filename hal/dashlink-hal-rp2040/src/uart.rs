//! Host link over a buffered UART
//!
//! The interrupt-driven ring buffer absorbs bursts while the dispatcher is
//! busy applying a frame; reads pull one byte at a time from it and give up
//! after the caller's bound.

use dashlink_hal::{LinkError, LinkRx, LinkTx};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error as UartError};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

/// Host link built from the two halves of a buffered UART
pub struct UartLink {
    rx: BufferedUartRx,
    tx: BufferedUartTx,
}

impl UartLink {
    pub fn new(rx: BufferedUartRx, tx: BufferedUartTx) -> Self {
        Self { rx, tx }
    }
}

fn map_error(e: UartError) -> LinkError {
    match e {
        UartError::Overrun => LinkError::Overrun,
        _ => LinkError::Line,
    }
}

impl LinkRx for UartLink {
    async fn read_byte_within(&mut self, timeout_ms: u32) -> Result<u8, LinkError> {
        let mut byte = [0u8; 1];
        let wait = Duration::from_millis(timeout_ms as u64);
        match with_timeout(wait, self.rx.read(&mut byte)).await {
            Ok(Ok(1)) => Ok(byte[0]),
            // A zero-length read never happens on a UART; treat it as a
            // missed byte
            Ok(Ok(_)) => Err(LinkError::Timeout),
            Ok(Err(e)) => Err(map_error(e)),
            Err(_) => Err(LinkError::Timeout),
        }
    }
}

impl LinkTx for UartLink {
    async fn write(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.tx.write_all(data).await.map_err(|_| LinkError::Write)
    }

    async fn flush(&mut self) -> Result<(), LinkError> {
        self.tx.flush().await.map_err(|_| LinkError::Write)
    }
}
