//! Protocol session (frame reader)
//!
//! Wraps a host link and applies one read timeout to every payload byte.
//! Exposes the two primitives the command handlers are built from:
//! - read the next byte, or fail on timeout
//! - read bytes up to a delimiter, or fail on timeout

use dashlink_hal::{Link, LinkError};
use heapless::Vec;

/// Errors while reading a command payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The bounded wait expired before the byte arrived
    Timeout,
    /// Delimited field did not fit; the excess up to the delimiter was
    /// consumed and dropped
    Overflow,
    /// Link-level failure
    Link(LinkError),
}

impl From<LinkError> for ReadError {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::Timeout => ReadError::Timeout,
            other => ReadError::Link(other),
        }
    }
}

/// Host link session
#[derive(Debug)]
pub struct Session<L> {
    link: L,
    timeout_ms: u32,
}

impl<L: Link> Session<L> {
    /// Create a session with the given per-byte payload timeout
    pub fn new(link: L, timeout_ms: u32) -> Self {
        Self { link, timeout_ms }
    }

    /// Access the underlying link
    pub fn link(&mut self) -> &mut L {
        &mut self.link
    }

    /// Release the underlying link
    pub fn into_inner(self) -> L {
        self.link
    }

    /// Wait up to `wait_ms` for any byte
    ///
    /// Used by the idle loop to poll for a header with a wait independent
    /// of the payload timeout.
    pub async fn poll_byte(&mut self, wait_ms: u32) -> Result<u8, ReadError> {
        Ok(self.link.read_byte_within(wait_ms).await?)
    }

    /// Read the next payload byte
    pub async fn read_byte(&mut self) -> Result<u8, ReadError> {
        Ok(self.link.read_byte_within(self.timeout_ms).await?)
    }

    /// Fill `buf` completely
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ReadError> {
        for slot in buf.iter_mut() {
            *slot = self.read_byte().await?;
        }
        Ok(())
    }

    /// Read bytes until any of `delimiters` is seen
    ///
    /// The delimiter is consumed but not stored. On overflow the rest of the
    /// field is still drained so the next field starts on a clean boundary;
    /// `out` then holds the first `N` bytes and `Overflow` is returned.
    pub async fn read_until<const N: usize>(
        &mut self,
        delimiters: &[u8],
        out: &mut Vec<u8, N>,
    ) -> Result<(), ReadError> {
        out.clear();
        let mut overflowed = false;
        loop {
            let byte = self.read_byte().await?;
            if delimiters.contains(&byte) {
                break;
            }
            if out.push(byte).is_err() {
                overflowed = true;
            }
        }
        if overflowed {
            Err(ReadError::Overflow)
        } else {
            Ok(())
        }
    }

    /// Queue response bytes
    pub async fn write(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.link.write(data).await
    }

    /// Queue a single response byte
    pub async fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        self.link.write(&[byte]).await
    }

    /// Flush queued response bytes
    pub async fn flush(&mut self) -> Result<(), LinkError> {
        self.link.flush().await
    }
}
