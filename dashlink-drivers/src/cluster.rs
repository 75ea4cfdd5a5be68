//! Lamp-only instrument cluster
//!
//! Stands in for a bus-attached cluster on boards that only have indicator
//! lamps wired. Gauge values are latched into a [`ClusterState`] snapshot;
//! a refresh hands the snapshot to a [`StateSink`] only when it changed.
//! Indicators go straight to the lamp driver and never mark the state
//! changed, so blinking does not flood the sink.

use dashlink_core::traits::{IndicatorOutput, InstrumentCluster, Side};
use dashlink_protocol::ClockTime;

/// Latched gauge values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClusterState {
    pub coolant_temp: i32,
    pub outdoor_temp: i32,
    pub speed: i32,
    pub rpm: i32,
    pub fuel_percent: i32,
    pub gear: char,
    pub time: ClockTime,
    pub odometer: u32,
    pub chime: bool,
    pub brightness: i32,
    pub left_indicator: bool,
    pub right_indicator: bool,
}

impl Default for ClusterState {
    fn default() -> Self {
        Self {
            coolant_temp: 0,
            outdoor_temp: 0,
            speed: 0,
            rpm: 0,
            fuel_percent: 0,
            gear: ' ',
            time: ClockTime::default(),
            odometer: 0,
            chime: false,
            brightness: 0,
            left_indicator: false,
            right_indicator: false,
        }
    }
}

/// Receives the latched state each time a refresh finds it changed
pub trait StateSink {
    fn publish(&mut self, state: &ClusterState);
}

/// Discards every snapshot
impl StateSink for () {
    fn publish(&mut self, _state: &ClusterState) {}
}

impl<F: FnMut(&ClusterState)> StateSink for F {
    fn publish(&mut self, state: &ClusterState) {
        self(state)
    }
}

pub struct LampCluster<I, S = ()> {
    lamps: I,
    sink: S,
    state: ClusterState,
    /// Latched state changed since the last refresh
    dirty: bool,
}

impl<I: IndicatorOutput> LampCluster<I> {
    pub fn new(lamps: I) -> Self {
        Self::with_sink(lamps, ())
    }
}

impl<I: IndicatorOutput, S: StateSink> LampCluster<I, S> {
    /// Cluster whose refreshes hand changed snapshots to `sink`
    pub fn with_sink(lamps: I, sink: S) -> Self {
        Self {
            lamps,
            sink,
            state: ClusterState::default(),
            dirty: false,
        }
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    pub fn lamps(&self) -> &I {
        &self.lamps
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// True if a setter changed the state since the last refresh
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn latch<T: PartialEq>(dirty: &mut bool, slot: &mut T, value: T) {
        if *slot != value {
            *slot = value;
            *dirty = true;
        }
    }
}

impl<I: IndicatorOutput, S: StateSink> IndicatorOutput for LampCluster<I, S> {
    fn set_indicator(&mut self, side: Side, on: bool) {
        let slot = match side {
            Side::Left => &mut self.state.left_indicator,
            Side::Right => &mut self.state.right_indicator,
        };
        *slot = on;
        self.lamps.set_indicator(side, on);
    }
}

impl<I: IndicatorOutput, S: StateSink> InstrumentCluster for LampCluster<I, S> {
    fn init(&mut self) {
        self.state = ClusterState::default();
        self.lamps.set_indicator(Side::Left, false);
        self.lamps.set_indicator(Side::Right, false);
        self.dirty = true;
    }

    fn set_coolant_temp(&mut self, celsius: i32) {
        Self::latch(&mut self.dirty, &mut self.state.coolant_temp, celsius);
    }

    fn set_outdoor_temp(&mut self, celsius: i32) {
        Self::latch(&mut self.dirty, &mut self.state.outdoor_temp, celsius);
    }

    fn set_speed(&mut self, mph: i32) {
        Self::latch(&mut self.dirty, &mut self.state.speed, mph);
    }

    fn set_rpm(&mut self, rpm: i32) {
        Self::latch(&mut self.dirty, &mut self.state.rpm, rpm);
    }

    fn set_fuel_level(&mut self, percent: i32) {
        Self::latch(&mut self.dirty, &mut self.state.fuel_percent, percent.clamp(0, 100));
    }

    fn set_gear(&mut self, gear: char) {
        Self::latch(&mut self.dirty, &mut self.state.gear, gear);
    }

    fn set_time(&mut self, time: ClockTime) {
        Self::latch(&mut self.dirty, &mut self.state.time, time);
    }

    fn set_odometer(&mut self, distance: u32) {
        Self::latch(&mut self.dirty, &mut self.state.odometer, distance);
    }

    fn set_chime(&mut self, enabled: bool) {
        Self::latch(&mut self.dirty, &mut self.state.chime, enabled);
    }

    fn set_brightness(&mut self, level: i32) {
        Self::latch(&mut self.dirty, &mut self.state.brightness, level);
    }

    fn refresh(&mut self) {
        if core::mem::take(&mut self.dirty) {
            self.sink.publish(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashlink_protocol::Meridiem;
    use std::vec::Vec;

    #[derive(Default)]
    struct Lamps {
        left: bool,
        right: bool,
    }

    impl IndicatorOutput for Lamps {
        fn set_indicator(&mut self, side: Side, on: bool) {
            match side {
                Side::Left => self.left = on,
                Side::Right => self.right = on,
            }
        }
    }

    #[test]
    fn test_latches_values() {
        let mut cluster = LampCluster::new(Lamps::default());
        cluster.init();
        assert!(cluster.is_dirty());
        cluster.refresh();

        cluster.set_speed(88);
        cluster.set_time(ClockTime {
            hour: 3,
            minute: 15,
            meridiem: Meridiem::Pm,
        });
        assert!(cluster.is_dirty());
        assert_eq!(cluster.state().speed, 88);
        assert_eq!(cluster.state().time.hour, 3);
        cluster.refresh();

        // Same value again is not a change
        cluster.set_speed(88);
        assert!(!cluster.is_dirty());
    }

    #[test]
    fn test_fuel_is_clamped() {
        let mut cluster = LampCluster::new(Lamps::default());
        cluster.set_fuel_level(140);
        assert_eq!(cluster.state().fuel_percent, 100);
        cluster.set_fuel_level(-3);
        assert_eq!(cluster.state().fuel_percent, 0);
    }

    #[test]
    fn test_indicators_reach_lamps() {
        let mut cluster = LampCluster::new(Lamps::default());
        cluster.set_indicator(Side::Right, true);
        assert!(cluster.lamps().right);
        assert!(!cluster.lamps().left);
        assert!(cluster.state().right_indicator);
    }

    #[test]
    fn test_refresh_publishes_only_changes() {
        let mut frames: Vec<ClusterState> = Vec::new();
        {
            let mut cluster =
                LampCluster::with_sink(Lamps::default(), |state: &ClusterState| {
                    frames.push(*state)
                });
            cluster.init();
            cluster.refresh();
            // Nothing changed since the last refresh
            cluster.refresh();

            cluster.set_rpm(3200);
            cluster.set_gear('4');
            cluster.refresh();
            assert!(!cluster.is_dirty());
        }

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], ClusterState::default());
        assert_eq!(frames[1].rpm, 3200);
        assert_eq!(frames[1].gear, '4');
    }

    #[test]
    fn test_indicators_do_not_trigger_publish() {
        let mut published = 0u32;
        {
            let mut cluster =
                LampCluster::with_sink(Lamps::default(), |_: &ClusterState| published += 1);
            cluster.set_indicator(Side::Left, true);
            cluster.refresh();
            assert!(cluster.lamps().left);
        }
        assert_eq!(published, 0);
    }
}
