//! Opcodes and fixed reply bytes

/// Byte that precedes every command from the host
pub const MESSAGE_HEADER: u8 = 0x03;

/// Reply to [`Opcode::Acknowledge`]
pub const ACQ_REPLY: u8 = 0x03;

/// Written once after a complete data payload has been consumed
pub const DATA_ACK: u8 = 0x15;

/// Reply to [`Opcode::Shutdown`]
pub const SHUTDOWN_REPLY: u8 = 0x01;

// Wire format values: queries
const OP_HELLO: u8 = b'1';
const OP_ACKNOWLEDGE: u8 = b'A';
const OP_DEVICE_NAME: u8 = b'N';
const OP_UNIQUE_ID: u8 = b'I';
const OP_FEATURES: u8 = b'0';
const OP_EXPANDED: u8 = b'X';
const OP_BUTTONS_COUNT: u8 = b'J';
const OP_TM1638_COUNT: u8 = b'2';
const OP_SEVEN_SEGMENT_COUNT: u8 = b'B';
const OP_RGB_LEDS_COUNT: u8 = b'4';
const OP_SHUTDOWN: u8 = b'D';

// Wire format values: data
const OP_TM1638_DATA: u8 = b'3';
const OP_SEVEN_SEGMENT_DATA: u8 = b'S';
const OP_LED_MATRIX_DATA: u8 = b'M';
const OP_RGB_LEDS_DATA: u8 = b'6';
const OP_RGB_MATRIX_DATA: u8 = b'R';
const OP_GEAR_DATA: u8 = b'G';
const OP_TELEMETRY: u8 = b'P';

/// Commands understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    /// Handshake; one ignored payload byte, replies with the version char
    Hello,
    /// Liveness probe
    Acknowledge,
    /// Device name followed by a newline
    DeviceName,
    /// Unique identifier string
    UniqueId,
    /// Feature flag characters followed by a newline
    Features,
    /// Word-addressed extension commands (`list`, `mcutype`)
    Expanded,
    /// Number of buttons
    ButtonsCount,
    /// Number of TM1638 boards
    Tm1638Count,
    /// Number of simple 7-segment modules
    SevenSegmentCount,
    /// Number of addressable RGB LEDs
    RgbLedsCount,
    /// Host is going away
    Shutdown,
    /// One chunk per TM1638 board
    Tm1638Data,
    /// One chunk per simple 7-segment module
    SevenSegmentData,
    /// One chunk per LED matrix module
    LedMatrixData,
    /// One RGB triple per LED
    RgbLedsData,
    /// One RGB triple per matrix pixel
    RgbMatrixData,
    /// Single gear character
    GearData,
    /// One ASCII telemetry line
    Telemetry,
}

impl Opcode {
    /// Parse an opcode from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_HELLO => Some(Opcode::Hello),
            OP_ACKNOWLEDGE => Some(Opcode::Acknowledge),
            OP_DEVICE_NAME => Some(Opcode::DeviceName),
            OP_UNIQUE_ID => Some(Opcode::UniqueId),
            OP_FEATURES => Some(Opcode::Features),
            OP_EXPANDED => Some(Opcode::Expanded),
            OP_BUTTONS_COUNT => Some(Opcode::ButtonsCount),
            OP_TM1638_COUNT => Some(Opcode::Tm1638Count),
            OP_SEVEN_SEGMENT_COUNT => Some(Opcode::SevenSegmentCount),
            OP_RGB_LEDS_COUNT => Some(Opcode::RgbLedsCount),
            OP_SHUTDOWN => Some(Opcode::Shutdown),
            OP_TM1638_DATA => Some(Opcode::Tm1638Data),
            OP_SEVEN_SEGMENT_DATA => Some(Opcode::SevenSegmentData),
            OP_LED_MATRIX_DATA => Some(Opcode::LedMatrixData),
            OP_RGB_LEDS_DATA => Some(Opcode::RgbLedsData),
            OP_RGB_MATRIX_DATA => Some(Opcode::RgbMatrixData),
            OP_GEAR_DATA => Some(Opcode::GearData),
            OP_TELEMETRY => Some(Opcode::Telemetry),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Hello => OP_HELLO,
            Opcode::Acknowledge => OP_ACKNOWLEDGE,
            Opcode::DeviceName => OP_DEVICE_NAME,
            Opcode::UniqueId => OP_UNIQUE_ID,
            Opcode::Features => OP_FEATURES,
            Opcode::Expanded => OP_EXPANDED,
            Opcode::ButtonsCount => OP_BUTTONS_COUNT,
            Opcode::Tm1638Count => OP_TM1638_COUNT,
            Opcode::SevenSegmentCount => OP_SEVEN_SEGMENT_COUNT,
            Opcode::RgbLedsCount => OP_RGB_LEDS_COUNT,
            Opcode::Shutdown => OP_SHUTDOWN,
            Opcode::Tm1638Data => OP_TM1638_DATA,
            Opcode::SevenSegmentData => OP_SEVEN_SEGMENT_DATA,
            Opcode::LedMatrixData => OP_LED_MATRIX_DATA,
            Opcode::RgbLedsData => OP_RGB_LEDS_DATA,
            Opcode::RgbMatrixData => OP_RGB_MATRIX_DATA,
            Opcode::GearData => OP_GEAR_DATA,
            Opcode::Telemetry => OP_TELEMETRY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Opcode; 18] = [
        Opcode::Hello,
        Opcode::Acknowledge,
        Opcode::DeviceName,
        Opcode::UniqueId,
        Opcode::Features,
        Opcode::Expanded,
        Opcode::ButtonsCount,
        Opcode::Tm1638Count,
        Opcode::SevenSegmentCount,
        Opcode::RgbLedsCount,
        Opcode::Shutdown,
        Opcode::Tm1638Data,
        Opcode::SevenSegmentData,
        Opcode::LedMatrixData,
        Opcode::RgbLedsData,
        Opcode::RgbMatrixData,
        Opcode::GearData,
        Opcode::Telemetry,
    ];

    #[test]
    fn test_opcode_bytes_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.to_byte(), b.to_byte(), "{:?} / {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_opcode_from_byte() {
        for op in ALL {
            assert_eq!(Opcode::from_byte(op.to_byte()), Some(op));
        }
    }

    #[test]
    fn test_header_is_not_an_opcode() {
        assert!(Opcode::from_byte(MESSAGE_HEADER).is_none());
        assert!(Opcode::from_byte(0xFF).is_none());
    }
}
