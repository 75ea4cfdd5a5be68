//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage in the last
//! 64KB of flash. Odometer records are a few bytes each, so one partition
//! holds thousands of writes before a page is erased.
//!
//! Implements the `FlashStorage` trait from `dashlink-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use dashlink_hal::flash::{FlashError, StorageKey};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the storage partition
pub const STORAGE_RANGE: core::ops::Range<u32> =
    (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for sequential-storage item (de)serialization
const ITEM_BUFFER_SIZE: usize = 128;

/// RP2040 Flash storage implementation
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Erase the whole storage partition
    ///
    /// Used to recover from a partition sequential-storage reports as
    /// corrupt.
    pub async fn erase_partition(&mut self) -> Result<(), FlashError> {
        self.flash
            .erase(STORAGE_RANGE.start, STORAGE_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}

impl<'d> dashlink_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }
}
