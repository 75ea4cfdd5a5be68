//! Instrument cluster traits

use dashlink_protocol::ClockTime;

/// Which turn indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// Turn indicator lamps
pub trait IndicatorOutput {
    /// Switch one indicator lamp
    fn set_indicator(&mut self, side: Side, on: bool);
}

/// Vehicle instrument cluster driven by telemetry records
///
/// Setters only latch values. Implementations that talk to the cluster
/// over a bus send the latched state from `refresh`, which the tick phase
/// calls at a bounded rate.
pub trait InstrumentCluster: IndicatorOutput {
    /// Bring the cluster up, called once before the first command
    fn init(&mut self) {}

    /// Coolant temperature (°C, already scaled)
    fn set_coolant_temp(&mut self, celsius: i32);

    /// Outdoor temperature display
    fn set_outdoor_temp(&mut self, celsius: i32);

    /// Road speed (mph)
    fn set_speed(&mut self, mph: i32);

    /// Engine speed (RPM)
    fn set_rpm(&mut self, rpm: i32);

    /// Fuel level (0-100 %)
    fn set_fuel_level(&mut self, percent: i32);

    /// Gear indicator character
    fn set_gear(&mut self, gear: char);

    /// Dashboard clock
    fn set_time(&mut self, time: ClockTime);

    /// Odometer counter
    fn set_odometer(&mut self, distance: u32);

    /// Audible chime on/off
    fn set_chime(&mut self, enabled: bool);

    /// Backlight level
    fn set_brightness(&mut self, level: i32);

    /// Push latched state to the hardware
    fn refresh(&mut self) {}
}
