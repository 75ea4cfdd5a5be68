//! Telemetry record decoding
//!
//! One record is a single ASCII line:
//! ```text
//! coolant,speed,rpm,fuel,oil,gear,timestamp,odometer,volume,shift_rpm,brake,opponents,right,left
//! ```
//! Field order is fixed. Reordering fields requires a protocol change on
//! both ends.
//!
//! Decoding never fails. A short or garbled line leaves the missing fields
//! at their defaults because the host has no way to resend a record.

use heapless::String;

/// Field separator
pub const FIELD_SEPARATOR: u8 = b',';

/// Number of fields in a complete record
pub const FIELD_COUNT: u8 = 14;

/// Maximum stored timestamp length
pub const MAX_TIMESTAMP_LEN: usize = 32;

/// Coolant gauge scale applied to the raw water temperature (percent)
pub const COOLANT_SCALE_PERCENT: i32 = 72;

/// Gear shown when the gear field is missing or empty
pub const DEFAULT_GEAR: char = ' ';

/// Morning or afternoon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Meridiem {
    #[default]
    Am,
    Pm,
}

/// 12-hour wall clock time extracted from the timestamp field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    /// Hour, 1-12
    pub hour: u8,
    /// Minute, 0-59 as sent by the host
    pub minute: u8,
    pub meridiem: Meridiem,
}

impl Default for ClockTime {
    fn default() -> Self {
        Self {
            hour: 12,
            minute: 0,
            meridiem: Meridiem::Am,
        }
    }
}

impl ClockTime {
    /// Extract the clock from a free-text date-time such as
    /// `"3/6/2025 05:45:34 PM"`
    ///
    /// Locates the first space, then the first two colons after it.
    /// Anything that does not match leaves the corresponding part at its
    /// default.
    pub fn parse(timestamp: &str) -> Self {
        let mut clock = ClockTime::default();

        let Some(space) = timestamp.find(' ') else {
            return clock;
        };
        let time = &timestamp[space + 1..];

        if time.contains("PM") {
            clock.meridiem = Meridiem::Pm;
        }

        let Some(first) = time.find(':') else {
            return clock;
        };
        let Some(second) = time[first + 1..].find(':').map(|i| i + first + 1) else {
            return clock;
        };

        let hour = parse_int(&time[..first]);
        let minute = parse_int(&time[first + 1..second]);

        // 24-hour values fold onto the 12-hour dial
        let hour = if hour == 0 {
            12
        } else if hour > 12 {
            hour - 12
        } else {
            hour
        };

        clock.hour = hour.clamp(0, u8::MAX as i32) as u8;
        clock.minute = minute.clamp(0, u8::MAX as i32) as u8;
        clock
    }
}

/// One decoded telemetry snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    /// Coolant temperature: raw water temperature scaled by 0.72, floored
    pub coolant_temp: i32,
    /// Vehicle speed (mph)
    pub speed: i32,
    /// Engine speed
    pub rpm: i32,
    /// Fuel level, percent
    pub fuel_percent: i32,
    /// Oil temperature
    pub oil_temp: i32,
    /// Gear character (first byte of the gear field)
    pub gear: char,
    /// Raw date-time text
    pub timestamp: String<MAX_TIMESTAMP_LEN>,
    /// Session odometer counter
    pub odometer: i32,
    /// Game volume level
    pub volume: i32,
    /// Shift light RPM threshold
    pub shift_light_rpm: i32,
    /// Brake pedal, percent
    pub brake_percent: i32,
    /// Number of opponents
    pub opponents: i32,
    /// Right turn indicator raw sample
    pub right_indicator: i32,
    /// Left turn indicator raw sample
    pub left_indicator: i32,
    /// Number of fields actually present in the line
    pub fields_present: u8,
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self {
            coolant_temp: 0,
            speed: 0,
            rpm: 0,
            fuel_percent: 0,
            oil_temp: 0,
            gear: DEFAULT_GEAR,
            timestamp: String::new(),
            odometer: 0,
            volume: 0,
            shift_light_rpm: 0,
            brake_percent: 0,
            opponents: 0,
            right_indicator: 0,
            left_indicator: 0,
            fields_present: 0,
        }
    }
}

impl TelemetryRecord {
    /// Decode one line (with or without its line terminator)
    pub fn decode(line: &[u8]) -> Self {
        let mut record = TelemetryRecord::default();
        let mut fields = Fields::new(trim_line_end(line));
        // A short line stops filling early; the decoded prefix is kept
        let _ = record.fill(&mut fields);
        record.fields_present = fields.taken;
        record
    }

    /// Returns true if every field was present
    pub fn is_complete(&self) -> bool {
        self.fields_present == FIELD_COUNT
    }

    /// Clock parsed from the timestamp field
    pub fn clock(&self) -> ClockTime {
        ClockTime::parse(&self.timestamp)
    }

    fn fill(&mut self, fields: &mut Fields<'_>) -> Option<()> {
        self.coolant_temp = scale_coolant(parse_int_bytes(fields.next()?));
        self.speed = parse_int_bytes(fields.next()?);
        self.rpm = parse_int_bytes(fields.next()?);
        self.fuel_percent = parse_int_bytes(fields.next()?);
        self.oil_temp = parse_int_bytes(fields.next()?);
        self.gear = fields
            .next()?
            .first()
            .map(|&b| b as char)
            .unwrap_or(DEFAULT_GEAR);
        self.timestamp = copy_text(fields.next()?);
        self.odometer = parse_int_bytes(fields.next()?);
        self.volume = parse_int_bytes(fields.next()?);
        self.shift_light_rpm = parse_int_bytes(fields.next()?);
        self.brake_percent = parse_int_bytes(fields.next()?);
        self.opponents = parse_int_bytes(fields.next()?);
        self.right_indicator = parse_int_bytes(fields.next()?);
        // The final field ends at the line terminator, not at a separator
        self.left_indicator = parse_int_bytes(fields.rest()?);
        Some(())
    }
}

/// Left-to-right field tokenizer that counts what it hands out
struct Fields<'a> {
    remaining: Option<&'a [u8]>,
    taken: u8,
}

impl<'a> Fields<'a> {
    fn new(line: &'a [u8]) -> Self {
        Self {
            remaining: if line.is_empty() { None } else { Some(line) },
            taken: 0,
        }
    }

    /// Next separator-delimited token
    ///
    /// A token without a following separator is the last one on the line.
    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.remaining?;
        self.taken += 1;
        match rest.iter().position(|&b| b == FIELD_SEPARATOR) {
            Some(i) => {
                self.remaining = Some(&rest[i + 1..]);
                Some(&rest[..i])
            }
            None => {
                self.remaining = None;
                Some(rest)
            }
        }
    }

    /// Everything left on the line
    fn rest(&mut self) -> Option<&'a [u8]> {
        let rest = self.remaining.take()?;
        self.taken += 1;
        Some(rest)
    }
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [head @ .., b'\r' | b'\n'] = line {
        line = head;
    }
    line
}

fn scale_coolant(raw: i32) -> i32 {
    // floor(raw * 0.72) in integer arithmetic
    (raw as i64 * COOLANT_SCALE_PERCENT as i64).div_euclid(100) as i32
}

fn copy_text(token: &[u8]) -> String<MAX_TIMESTAMP_LEN> {
    let mut text = String::new();
    for &b in token.iter().take(MAX_TIMESTAMP_LEN) {
        if b.is_ascii() {
            let _ = text.push(b as char);
        }
    }
    text
}

/// ASCII-to-integer with the device-wide rule
///
/// Leading whitespace is skipped, an optional sign is honoured, digits are
/// accumulated up to the first non-digit. No digits yields 0. Fractional
/// input therefore truncates toward zero. Saturates instead of overflowing.
pub fn parse_int_bytes(token: &[u8]) -> i32 {
    let mut iter = token
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .peekable();

    let negative = match iter.peek() {
        Some(b'-') => {
            iter.next();
            true
        }
        Some(b'+') => {
            iter.next();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    for b in iter {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = (b - b'0') as i32;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// [`parse_int_bytes`] for `&str`
pub fn parse_int(token: &str) -> i32 {
    parse_int_bytes(token.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"180,60,3000,75,200,3,3/6/2025 05:45:34 PM,100,5,6500,0,0,1,0\n";

    #[test]
    fn test_decode_full_record() {
        let record = TelemetryRecord::decode(SAMPLE);

        assert_eq!(record.coolant_temp, 129); // floor(180 * 0.72)
        assert_eq!(record.speed, 60);
        assert_eq!(record.rpm, 3000);
        assert_eq!(record.fuel_percent, 75);
        assert_eq!(record.oil_temp, 200);
        assert_eq!(record.gear, '3');
        assert_eq!(record.timestamp.as_str(), "3/6/2025 05:45:34 PM");
        assert_eq!(record.odometer, 100);
        assert_eq!(record.volume, 5);
        assert_eq!(record.shift_light_rpm, 6500);
        assert_eq!(record.brake_percent, 0);
        assert_eq!(record.opponents, 0);
        assert_eq!(record.right_indicator, 1);
        assert_eq!(record.left_indicator, 0);
        assert!(record.is_complete());

        let clock = record.clock();
        assert_eq!(clock.hour, 5);
        assert_eq!(clock.minute, 45);
        assert_eq!(clock.meridiem, Meridiem::Pm);
    }

    #[test]
    fn test_missing_trailing_field_defaults() {
        let record = TelemetryRecord::decode(b"180,60,3000,75,200,3,3/6/2025 05:45:34 PM,100,5,6500,0,0,1");

        assert_eq!(record.right_indicator, 1);
        assert_eq!(record.left_indicator, 0);
        assert_eq!(record.fields_present, 13);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_truncated_record_keeps_decoded_prefix() {
        let record = TelemetryRecord::decode(b"100,42");

        assert_eq!(record.coolant_temp, 72);
        assert_eq!(record.speed, 42);
        assert_eq!(record.rpm, 0);
        assert_eq!(record.gear, DEFAULT_GEAR);
        assert!(record.timestamp.is_empty());
        assert_eq!(record.fields_present, 2);
    }

    #[test]
    fn test_empty_line() {
        let record = TelemetryRecord::decode(b"\n");
        assert_eq!(record, TelemetryRecord::default());
        assert_eq!(record.clock(), ClockTime::default());
    }

    #[test]
    fn test_empty_gear_field() {
        let record = TelemetryRecord::decode(b"0,0,0,0,0,,x,0,0,0,0,0,0,0");
        assert_eq!(record.gear, DEFAULT_GEAR);
        assert!(record.is_complete());
    }

    #[test]
    fn test_gear_takes_first_character() {
        let record = TelemetryRecord::decode(b"0,0,0,0,0,Rev,,0");
        assert_eq!(record.gear, 'R');
    }

    #[test]
    fn test_final_field_runs_to_line_end() {
        let record = TelemetryRecord::decode(b"0,0,0,0,0,N,,0,0,0,0,0,0,1,9");
        assert_eq!(record.left_indicator, 1);
        assert!(record.is_complete());
    }

    #[test]
    fn test_garbage_numeric_fields_are_zero() {
        let record = TelemetryRecord::decode(b"abc,??,-,12x,7.9");
        assert_eq!(record.coolant_temp, 0);
        assert_eq!(record.speed, 0);
        assert_eq!(record.rpm, 0);
        assert_eq!(record.fuel_percent, 12);
        assert_eq!(record.oil_temp, 7);
    }

    #[test]
    fn test_negative_coolant_floors() {
        // -10 * 0.72 = -7.2, floor = -8
        let record = TelemetryRecord::decode(b"-10");
        assert_eq!(record.coolant_temp, -8);
    }

    #[test]
    fn test_parse_int_rules() {
        assert_eq!(parse_int("  42"), 42);
        assert_eq!(parse_int("-17abc"), -17);
        assert_eq!(parse_int("+5"), 5);
        assert_eq!(parse_int("3.99"), 3);
        assert_eq!(parse_int("-3.99"), -3);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("x1"), 0);
        assert_eq!(parse_int("99999999999"), i32::MAX);
        assert_eq!(parse_int("-99999999999"), i32::MIN);
    }

    #[test]
    fn test_clock_24_hour_folding() {
        let clock = ClockTime::parse("2025-03-06 17:05:00");
        assert_eq!(clock.hour, 5);
        assert_eq!(clock.minute, 5);
        assert_eq!(clock.meridiem, Meridiem::Am);

        let midnight = ClockTime::parse("3/6/2025 00:30:00 AM");
        assert_eq!(midnight.hour, 12);
        assert_eq!(midnight.minute, 30);

        let noon = ClockTime::parse("3/6/2025 12:00:00 PM");
        assert_eq!(noon.hour, 12);
        assert_eq!(noon.meridiem, Meridiem::Pm);
    }

    #[test]
    fn test_clock_malformed_keeps_defaults() {
        assert_eq!(ClockTime::parse("no-space-here"), ClockTime::default());

        // Only one colon: meridiem still detected, time stays default
        let partial = ClockTime::parse("3/6/2025 05:45 PM");
        assert_eq!(partial.hour, 12);
        assert_eq!(partial.minute, 0);
        assert_eq!(partial.meridiem, Meridiem::Pm);
    }

    #[test]
    fn test_long_timestamp_truncated() {
        let mut line = std::vec::Vec::new();
        line.extend_from_slice(b"0,0,0,0,0,1,");
        line.extend_from_slice(&[b'9'; 40]);
        line.extend_from_slice(b",77");
        let record = TelemetryRecord::decode(&line);
        assert_eq!(record.timestamp.len(), MAX_TIMESTAMP_LEN);
        assert_eq!(record.odometer, 77);
    }
}
