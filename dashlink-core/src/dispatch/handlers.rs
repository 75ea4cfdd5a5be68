//! Per-opcode command handlers

use dashlink_hal::{Clock, FlashStorage, Link};
use dashlink_protocol::{
    Opcode, ReadError, TelemetryRecord, ACQ_REPLY, DATA_ACK, SHUTDOWN_REPLY,
};
use heapless::Vec;

use super::{CommandError, Device, MAX_EXPANDED_WORD, MAX_TELEMETRY_LINE};
use crate::config::{MAX_MATRIX_MODULES, MAX_RGB_LEDS, MAX_SEGMENT_MODULES};
use crate::registry::PeripheralKind;
use crate::traits::{MatrixChunk, Rgb, SegmentChunk};

const SEGMENT_BYTES: usize = MAX_SEGMENT_MODULES as usize * PeripheralKind::Tm1638.chunk_len();
const MATRIX_BYTES: usize = MAX_MATRIX_MODULES as usize * PeripheralKind::LedMatrix.chunk_len();
const RGB_BYTES: usize = MAX_RGB_LEDS as usize * PeripheralKind::RgbLeds.chunk_len();

impl<'a, L: Link, S: FlashStorage, C: Clock> Device<'a, L, S, C> {
    /// Run the handler for `opcode`
    ///
    /// The header and opcode byte have already been consumed.
    pub async fn dispatch(&mut self, opcode: Opcode) -> Result<(), CommandError> {
        match opcode {
            Opcode::Hello => {
                // Payload byte carries nothing we use
                self.session.read_byte().await?;
                let version = self.config.identity.version;
                self.reply(&[version]).await
            }
            Opcode::Acknowledge => self.reply(&[ACQ_REPLY]).await,
            Opcode::DeviceName => {
                let name = self.config.identity.name;
                self.session.write(name.as_bytes()).await?;
                self.reply(b"\n").await
            }
            Opcode::UniqueId => {
                let id = self.config.identity.unique_id;
                self.reply(id.as_bytes()).await
            }
            Opcode::Features => {
                let features = self.config.feature_set().encode();
                self.reply(features.as_bytes()).await
            }
            Opcode::Expanded => self.expanded().await,
            Opcode::ButtonsCount => self.reply_count(PeripheralKind::Buttons).await,
            Opcode::Tm1638Count => self.reply_count(PeripheralKind::Tm1638).await,
            Opcode::SevenSegmentCount => self.reply_count(PeripheralKind::SevenSegment).await,
            Opcode::RgbLedsCount => self.reply_count(PeripheralKind::RgbLeds).await,
            Opcode::Shutdown => self.reply(&[SHUTDOWN_REPLY]).await,
            Opcode::Tm1638Data => self.segment_data(PeripheralKind::Tm1638).await,
            Opcode::SevenSegmentData => self.segment_data(PeripheralKind::SevenSegment).await,
            Opcode::LedMatrixData => self.matrix_data().await,
            Opcode::RgbLedsData => self.rgb_data(PeripheralKind::RgbLeds).await,
            Opcode::RgbMatrixData => self.rgb_data(PeripheralKind::RgbMatrix).await,
            Opcode::GearData => self.gear_data().await,
            Opcode::Telemetry => self.telemetry().await,
        }
    }

    async fn reply(&mut self, bytes: &[u8]) -> Result<(), CommandError> {
        self.session.write(bytes).await?;
        self.session.flush().await?;
        Ok(())
    }

    async fn reply_count(&mut self, kind: PeripheralKind) -> Result<(), CommandError> {
        let count = self.registry.count_of(kind);
        self.reply(&[count]).await
    }

    async fn expanded(&mut self) -> Result<(), CommandError> {
        let mut word: Vec<u8, MAX_EXPANDED_WORD> = Vec::new();
        match self.session.read_until(b"\n", &mut word).await {
            Ok(()) => {}
            // No known word is that long
            Err(ReadError::Overflow) => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        match word.trim_ascii() {
            b"list" => {
                if self.registry.count_of(PeripheralKind::Encoders) > 0 {
                    self.session.write(b"encoders\n").await?;
                }
                self.session.write(b"mcutype\n").await?;
                self.reply(b"\n").await
            }
            b"encoderscount" => self.reply_count(PeripheralKind::Encoders).await,
            b"mcutype" => {
                let signature = self.config.identity.mcu_signature;
                self.reply(&signature).await
            }
            _ => Ok(()),
        }
    }

    /// Read the whole data payload for `kind`, keeping what fits in `buf`
    ///
    /// Bytes past `buf` are consumed and dropped. A timeout anywhere in the
    /// payload aborts before anything is applied.
    async fn read_payload<'b>(
        &mut self,
        kind: PeripheralKind,
        buf: &'b mut [u8],
    ) -> Result<&'b [u8], CommandError> {
        let len = self.registry.payload_len(kind);
        let kept = len.min(buf.len());
        self.session.read_exact(&mut buf[..kept]).await?;
        for _ in kept..len {
            self.session.read_byte().await?;
        }
        Ok(&buf[..kept])
    }

    async fn segment_data(&mut self, kind: PeripheralKind) -> Result<(), CommandError> {
        let chunk_len = kind.chunk_len();
        let mut buf = [0u8; SEGMENT_BYTES];
        let capacity = MAX_SEGMENT_MODULES as usize * chunk_len;
        let payload = self.read_payload(kind, &mut buf[..capacity]).await?;

        let bank = match kind {
            PeripheralKind::Tm1638 => self.peripherals.tm1638.as_deref_mut(),
            _ => self.peripherals.seven_segment.as_deref_mut(),
        };
        let Some(bank) = bank else {
            return Ok(());
        };
        for (index, raw) in payload.chunks_exact(chunk_len).enumerate() {
            let mut chunk = SegmentChunk {
                intensity: raw[0],
                ..Default::default()
            };
            chunk.digits.copy_from_slice(&raw[1..9]);
            // Only the TM1638 chunk carries the LED byte
            if let Some(&leds) = raw.get(9) {
                chunk.leds = leds;
            }
            bank.write_module(index as u8, &chunk);
        }
        Ok(())
    }

    async fn matrix_data(&mut self) -> Result<(), CommandError> {
        let mut buf = [0u8; MATRIX_BYTES];
        let payload = self.read_payload(PeripheralKind::LedMatrix, &mut buf).await?;

        if let Some(matrix) = self.peripherals.led_matrix.as_deref_mut() {
            let chunk_len = PeripheralKind::LedMatrix.chunk_len();
            for (index, raw) in payload.chunks_exact(chunk_len).enumerate() {
                let mut chunk = MatrixChunk {
                    intensity: raw[0],
                    ..Default::default()
                };
                chunk.rows.copy_from_slice(&raw[1..9]);
                matrix.write_module(index as u8, &chunk);
            }
        }
        Ok(())
    }

    async fn rgb_data(&mut self, kind: PeripheralKind) -> Result<(), CommandError> {
        let mut buf = [0u8; RGB_BYTES];
        let payload = self.read_payload(kind, &mut buf).await?;

        let strip = match kind {
            PeripheralKind::RgbMatrix => self.peripherals.rgb_matrix.as_deref_mut(),
            _ => self.peripherals.rgb_leds.as_deref_mut(),
        };
        if let Some(strip) = strip {
            for (index, px) in payload.chunks_exact(kind.chunk_len()).enumerate() {
                strip.set_pixel(index as u8, Rgb::new(px[0], px[1], px[2]));
            }
            strip.show();
        }
        self.reply(&[DATA_ACK]).await
    }

    async fn gear_data(&mut self) -> Result<(), CommandError> {
        let gear = self.session.read_byte().await? as char;
        if let Some(display) = self.peripherals.gear.as_deref_mut() {
            display.set_gear(gear);
        }
        Ok(())
    }

    async fn telemetry(&mut self) -> Result<(), CommandError> {
        let mut line: Vec<u8, MAX_TELEMETRY_LINE> = Vec::new();
        match self.session.read_until(b"\n", &mut line).await {
            // An overlong line still decodes from its kept prefix
            Ok(()) | Err(ReadError::Overflow) => {}
            Err(e) => return Err(e.into()),
        }

        let record = TelemetryRecord::decode(&line);
        self.apply_telemetry(&record);
        self.reply(&[DATA_ACK]).await
    }
}
