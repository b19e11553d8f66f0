//! Ambient light gate with hysteresis.
//!
//! A two-state machine (lamp ON / lamp OFF) driven by one lux sample per
//! animation tick. Hysteresis is a bounded signed counter rather than a
//! timer: a run of `threshold` bright samples is needed to switch off, a run
//! of `threshold` dark samples to switch back on, and a single noisy sample
//! can never flip the state.

/// Tuning for the daylight gate.
///
/// `off_lux` must sit above `on_lux`; the gap is the dead band in which the
/// counter holds still.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaylightConfig {
    /// Move toward ON while ambient light is at or below this level
    pub on_lux: f32,
    /// Move toward OFF while ambient light is at or above this level
    pub off_lux: f32,
    /// Consecutive-sample count needed to cross between states
    pub threshold: i16,
}

impl Default for DaylightConfig {
    fn default() -> Self {
        Self {
            on_lux: 15.0,
            off_lux: 60.0,
            threshold: 10,
        }
    }
}

/// Outcome of one gate update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateEvent {
    /// No state change this tick
    Unchanged,
    /// Lamp switched on (room went dark)
    TurnedOn,
    /// Lamp switched off (room is lit); blank the strip now
    TurnedOff,
}

/// Hysteresis state machine gating the flicker effect.
///
/// Starts in the ON state with the counter at the on extreme, so a lamp
/// powered up in a dark room lights immediately.
#[derive(Debug, Clone)]
pub struct DaylightGate {
    config: DaylightConfig,
    counter: i16,
    lamp_on: bool,
}

impl DaylightGate {
    pub fn new(config: DaylightConfig) -> Self {
        Self {
            counter: -config.threshold,
            lamp_on: true,
            config,
        }
    }

    /// Feed one lux sample and advance the state machine.
    ///
    /// The counter never leaves `[-threshold, +threshold]`, and each
    /// transition event fires exactly once, on the tick the counter first
    /// reaches the corresponding extreme.
    pub fn sample(&mut self, lux: f32) -> GateEvent {
        if lux >= self.config.off_lux && self.counter < self.config.threshold {
            self.counter += 1;
            if self.counter == self.config.threshold && self.lamp_on {
                self.lamp_on = false;
                return GateEvent::TurnedOff;
            }
        } else if lux <= self.config.on_lux && self.counter > -self.config.threshold {
            self.counter -= 1;
            if self.counter == -self.config.threshold && !self.lamp_on {
                self.lamp_on = true;
                return GateEvent::TurnedOn;
            }
        }
        GateEvent::Unchanged
    }

    /// Current verdict
    pub const fn is_on(&self) -> bool {
        self.lamp_on
    }

    /// Current hysteresis counter, for diagnostics
    pub const fn counter(&self) -> i16 {
        self.counter
    }
}
