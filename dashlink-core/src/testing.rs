//! Host-side doubles for the hardware traits

use core::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use dashlink_hal::{Clock, FlashError, FlashStorage, LinkError, LinkRx, LinkTx, StorageKey};
use dashlink_protocol::ClockTime;

use crate::traits::{
    GearDisplay, IndicatorOutput, InstrumentCluster, LedMatrix, MatrixChunk, Rgb, RgbStrip,
    SegmentBank, SegmentChunk, Side,
};

/// Link fed from a byte script, timing out once the script is exhausted
#[derive(Debug, Default)]
pub struct ScriptLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub flushes: usize,
}

impl ScriptLink {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }
}

impl LinkRx for ScriptLink {
    async fn read_byte_within(&mut self, _timeout_ms: u32) -> Result<u8, LinkError> {
        self.rx.pop_front().ok_or(LinkError::Timeout)
    }
}

impl LinkTx for ScriptLink {
    async fn write(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.tx.extend_from_slice(data);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), LinkError> {
        self.flushes += 1;
        Ok(())
    }
}

/// In-memory key-value flash
#[derive(Debug, Default)]
pub struct MemStorage {
    pub values: BTreeMap<u8, Vec<u8>>,
    pub writes: usize,
    pub fail_writes: bool,
}

impl FlashStorage for MemStorage {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let value = self.values.get(&key.as_u8()).ok_or(FlashError::NotFound)?;
        if value.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..value.len()].copy_from_slice(value);
        Ok(value.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.fail_writes {
            return Err(FlashError::Flash);
        }
        self.writes += 1;
        self.values.insert(key.as_u8(), data.to_vec());
        Ok(())
    }
}

/// Clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

/// Cluster that remembers the last value of every setter
#[derive(Debug, Default)]
pub struct RecordingCluster {
    pub initialised: bool,
    pub coolant: Option<i32>,
    pub outdoor: Option<i32>,
    pub speed: Option<i32>,
    pub rpm: Option<i32>,
    pub fuel: Option<i32>,
    pub gear: Option<char>,
    pub time: Option<ClockTime>,
    pub odometer: Option<u32>,
    pub chime: Option<bool>,
    pub brightness: Option<i32>,
    pub left: Option<bool>,
    pub right: Option<bool>,
    pub refreshes: usize,
}

impl IndicatorOutput for RecordingCluster {
    fn set_indicator(&mut self, side: Side, on: bool) {
        match side {
            Side::Left => self.left = Some(on),
            Side::Right => self.right = Some(on),
        }
    }
}

impl InstrumentCluster for RecordingCluster {
    fn init(&mut self) {
        self.initialised = true;
    }
    fn set_coolant_temp(&mut self, celsius: i32) {
        self.coolant = Some(celsius);
    }
    fn set_outdoor_temp(&mut self, celsius: i32) {
        self.outdoor = Some(celsius);
    }
    fn set_speed(&mut self, mph: i32) {
        self.speed = Some(mph);
    }
    fn set_rpm(&mut self, rpm: i32) {
        self.rpm = Some(rpm);
    }
    fn set_fuel_level(&mut self, percent: i32) {
        self.fuel = Some(percent);
    }
    fn set_gear(&mut self, gear: char) {
        self.gear = Some(gear);
    }
    fn set_time(&mut self, time: ClockTime) {
        self.time = Some(time);
    }
    fn set_odometer(&mut self, distance: u32) {
        self.odometer = Some(distance);
    }
    fn set_chime(&mut self, enabled: bool) {
        self.chime = Some(enabled);
    }
    fn set_brightness(&mut self, level: i32) {
        self.brightness = Some(level);
    }
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

/// Segment bank that records every module write
#[derive(Debug, Default)]
pub struct RecordingBank {
    pub writes: Vec<(u8, SegmentChunk)>,
}

impl SegmentBank for RecordingBank {
    fn write_module(&mut self, index: u8, chunk: &SegmentChunk) {
        self.writes.push((index, *chunk));
    }
}

#[derive(Debug, Default)]
pub struct RecordingMatrix {
    pub writes: Vec<(u8, MatrixChunk)>,
}

impl LedMatrix for RecordingMatrix {
    fn write_module(&mut self, index: u8, chunk: &MatrixChunk) {
        self.writes.push((index, *chunk));
    }
}

#[derive(Debug, Default)]
pub struct RecordingStrip {
    pub pixels: Vec<(u8, Rgb)>,
    pub shows: usize,
}

impl RgbStrip for RecordingStrip {
    fn set_pixel(&mut self, index: u8, colour: Rgb) {
        self.pixels.push((index, colour));
    }
    fn show(&mut self) {
        self.shows += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingGear {
    pub gear: Option<char>,
}

impl GearDisplay for RecordingGear {
    fn set_gear(&mut self, gear: char) {
        self.gear = Some(gear);
    }
}
