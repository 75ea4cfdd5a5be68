//! dashlink - Instrument Cluster Firmware
//!
//! Main firmware binary for RP2040-based dashboard boards. Listens for the
//! host's serial protocol, drives the attached display modules and keeps
//! the odometer in flash.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dashlink_core::odometer::OdometerError;
use dashlink_core::{Device, Peripherals, Served};
use dashlink_drivers::{ClusterState, GpioIndicators, Hc595GearDisplay, LampCluster, SegmentPolarity};
use dashlink_hal::FlashError;
use dashlink_hal_rp2040::{EmbassyClock, Rp2040FlashStorage, UartLink};

use crate::config::DEVICE_CONFIG;

mod config;

/// Host link speed
const BAUD_RATE: u32 = 115_200;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("dashlink firmware starting...");

    let config = DEVICE_CONFIG;
    if let Err(e) = config.validate() {
        defmt::panic!("Invalid device configuration: {}", e);
    }
    info!(
        "Device '{}' protocol version '{}'",
        config.identity.name,
        config.identity.version as char
    );

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());

    // Host link on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let link = UartLink::new(rx, tx);
    info!("UART initialized at {} baud", BAUD_RATE);

    let storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);

    // Turn indicator lamps (GPIO14 left, GPIO15 right)
    let lamps = GpioIndicators::new_active_high(
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    );
    let mut cluster = LampCluster::with_sink(lamps, |state: &ClusterState| {
        debug!("Cluster {}", state);
    });

    // Gear digit behind a 74HC595 (GPIO16 data, GPIO17 clock, GPIO18 latch)
    let mut gear = Hc595GearDisplay::new(
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        SegmentPolarity::CommonCathode,
    );

    let peripherals = Peripherals::new(&mut cluster).with_gear(&mut gear);
    let mut device = Device::new(link, storage, EmbassyClock, config, peripherals);

    match device.start().await {
        Ok(distance) => info!("Odometer restored: {}", distance),
        Err(OdometerError::Flash(FlashError::NotFound)) => {
            info!("No odometer record, starting from 0");
        }
        Err(OdometerError::Flash(FlashError::Storage)) => {
            warn!("Storage partition corrupt, erasing");
            if let Err(e) = device.storage().erase_partition().await {
                error!("Failed to erase storage: {}", e);
            }
        }
        Err(e) => warn!("Odometer not restored ({}), starting from 0", e),
    }

    info!("Modules: {}", device.config().modules);
    info!("Entering main loop");

    loop {
        match device.service().await {
            Ok(Served::Idle) => {}
            Ok(Served::Command(opcode)) => trace!("Served {}", opcode),
            Ok(Served::Noise(byte)) => trace!("Dropped stray byte {=u8:#04x}", byte),
            Ok(Served::Unknown(op)) => debug!("Unknown opcode {=u8:#04x}", op),
            Err(e) => warn!("Command aborted: {}", e),
        }

        match device.tick().await {
            Ok(Some(record)) => debug!("Odometer saved: {}", record.distance),
            Ok(None) => {}
            Err(e) => warn!("Odometer save failed: {}", e),
        }
    }
}
