//! Command dispatcher
//!
//! Owns the protocol session, the persistent storage and the clock, and
//! drives the peripheral adapters. The firmware alternates between two
//! calls:
//!
//! - [`Device::service`] waits briefly for a header and runs at most one
//!   complete command
//! - [`Device::tick`] advances the blink phase, refreshes the cluster and
//!   writes any pending odometer record
//!
//! Data commands buffer their whole payload before touching an adapter. A
//! timeout part way through leaves every adapter untouched and sends no
//! acknowledgement.

mod apply;
mod handlers;
pub mod peripherals;


pub use apply::{brightness_for_shift_rpm, map_range};
pub use peripherals::Peripherals;

use dashlink_hal::{Clock, FlashStorage, Link, LinkError};
use dashlink_protocol::{Opcode, ReadError, Session, MESSAGE_HEADER};

use crate::config::DeviceConfig;
use crate::odometer::{load_odometer, store_odometer, OdometerError, OdometerRecord, OdometerTracker};
use crate::registry::ModuleRegistry;
use crate::signal::Indicators;

/// Longest telemetry line kept; longer lines are truncated
pub const MAX_TELEMETRY_LINE: usize = 128;

/// Longest expanded-command word
pub const MAX_EXPANDED_WORD: usize = 16;

/// What one call to [`Device::service`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Served {
    /// Nothing arrived within the idle poll
    Idle,
    /// A byte other than the header arrived while idle and was dropped
    Noise(u8),
    /// Header followed by an unknown opcode, which was dropped
    Unknown(u8),
    /// A command ran to completion
    Command(Opcode),
}

/// A command that could not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Payload read failed; nothing was applied
    Read(ReadError),
    /// Response could not be written
    Write(LinkError),
}

impl From<ReadError> for CommandError {
    fn from(e: ReadError) -> Self {
        CommandError::Read(e)
    }
}

impl From<LinkError> for CommandError {
    fn from(e: LinkError) -> Self {
        CommandError::Write(e)
    }
}

/// The dashboard device
pub struct Device<'a, L, S, C> {
    session: Session<L>,
    storage: S,
    clock: C,
    config: DeviceConfig,
    registry: ModuleRegistry,
    indicators: Indicators,
    odometer: OdometerTracker,
    pending_odometer: Option<OdometerRecord>,
    last_refresh_ms: Option<u32>,
    peripherals: Peripherals<'a>,
}

impl<'a, L: Link, S: FlashStorage, C: Clock> Device<'a, L, S, C> {
    /// Assemble a device
    ///
    /// `config` is expected to have passed [`DeviceConfig::validate`].
    pub fn new(
        link: L,
        storage: S,
        clock: C,
        config: DeviceConfig,
        peripherals: Peripherals<'a>,
    ) -> Self {
        Self {
            session: Session::new(link, config.timing.read_timeout_ms),
            storage,
            clock,
            registry: ModuleRegistry::new(config.modules),
            indicators: Indicators::new(
                config.timing.debounce_threshold,
                config.timing.blink_interval_ms,
            ),
            odometer: OdometerTracker::new(config.odometer.persist_delta),
            pending_odometer: None,
            last_refresh_ms: None,
            config,
            peripherals,
        }
    }

    /// Initialise the cluster and restore the odometer baseline
    ///
    /// Returns the restored distance. On error the baseline is zero.
    pub async fn start(&mut self) -> Result<u32, OdometerError> {
        self.peripherals.cluster.init();
        match load_odometer(&mut self.storage).await {
            Ok(record) => {
                self.odometer.restore(record.distance);
                Ok(record.distance)
            }
            Err(e) => {
                self.odometer.restore(0);
                Err(e)
            }
        }
    }

    /// Wait up to the idle poll for a header and run one command
    pub async fn service(&mut self) -> Result<Served, CommandError> {
        let byte = match self.session.poll_byte(self.config.timing.idle_poll_ms).await {
            Ok(byte) => byte,
            Err(ReadError::Timeout) => return Ok(Served::Idle),
            Err(e) => return Err(e.into()),
        };
        if byte != MESSAGE_HEADER {
            return Ok(Served::Noise(byte));
        }

        let op = self.session.read_byte().await?;
        let Some(opcode) = Opcode::from_byte(op) else {
            return Ok(Served::Unknown(op));
        };
        self.dispatch(opcode).await?;
        Ok(Served::Command(opcode))
    }

    /// Time-driven housekeeping
    ///
    /// Returns the odometer record written to flash, if one was pending.
    /// A failed write drops the pending record; the next due value retries.
    pub async fn tick(&mut self) -> Result<Option<OdometerRecord>, OdometerError> {
        let now = self.clock.now_ms();
        self.indicators.tick(now, &mut *self.peripherals.cluster);

        if self.refresh_due(now) {
            self.peripherals.cluster.refresh();
            self.last_refresh_ms = Some(now);
        }

        let Some(record) = self.pending_odometer.take() else {
            return Ok(None);
        };
        store_odometer(&mut self.storage, &record).await?;
        self.odometer.commit(&record);
        Ok(Some(record))
    }

    fn refresh_due(&self, now: u32) -> bool {
        let interval = self.config.timing.cluster_refresh_ms;
        match self.last_refresh_ms {
            Some(last) if interval > 0 => now.wrapping_sub(last) >= interval,
            _ => true,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn odometer(&self) -> &OdometerTracker {
        &self.odometer
    }

    /// Record queued for the next tick
    pub fn pending_odometer(&self) -> Option<&OdometerRecord> {
        self.pending_odometer.as_ref()
    }

    pub fn link(&mut self) -> &mut L {
        self.session.link()
    }

    pub fn storage(&mut self) -> &mut S {
        &mut self.storage
    }
}
