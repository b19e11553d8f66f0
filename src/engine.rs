//! Randomized flicker rendering and the animation tick loop.
//!
//! [`FlickerEngine`] turns one configuration snapshot into one frame.
//! [`FlickerScheduler`] composes store, engine, and output driver into the
//! per-tick contract: render under the store lock, transmit the frame once,
//! hand the caller a randomized sleep. The caller owns the loop and the
//! actual sleeping, so the same scheduler drives embassy tasks, OS threads,
//! or a bare-metal core.

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, Rgb};
use crate::config::{FlickerRange, FramePacing, GroupConfig, LampConfig};
use crate::daylight::{DaylightGate, GateEvent};
use crate::rng::FlickerRng;
use crate::store::ConfigStore;
use crate::{LuxSensor, OutputDriver};

/// Frame renderer for a grouped LED strip
pub struct FlickerEngine<const MAX_LEDS: usize> {
    frame: [Rgb; MAX_LEDS],
    rng: FlickerRng,
}

impl<const MAX_LEDS: usize> FlickerEngine<MAX_LEDS> {
    pub fn new(seed: u64) -> Self {
        Self {
            frame: [BLACK; MAX_LEDS],
            rng: FlickerRng::new(seed),
        }
    }

    /// Render one frame into the internal buffer.
    ///
    /// Returns the number of LEDs filled, or `None` when this tick renders
    /// nothing (the config is paused or the daylight gate is holding the
    /// lamp off). The loop cadence is unaffected either way.
    pub fn render(&mut self, config: &LampConfig) -> Option<usize> {
        if config.paused || !config.lamp_on {
            return None;
        }

        let len = config.strip_len().min(MAX_LEDS);
        for group in &config.groups {
            self.render_group(group, len);
        }
        Some(len)
    }

    fn render_group(&mut self, group: &GroupConfig, len: usize) {
        let start = usize::from(group.bounds.start).min(len);
        let end = usize::from(group.bounds.end).min(len);

        for led in &mut self.frame[start..end] {
            let base = Self::pick_color(&mut self.rng, group);
            *led = Self::flicker(&mut self.rng, base, group.flicker);
        }
    }

    /// Pick this LED's color for the tick.
    ///
    /// One percentage draw in `[0, 100)` walked over cumulative alternate
    /// bands: the first alternate owns `[0, p0)`, the second `[p0, p0+p1)`,
    /// the base color the remainder. A draw equal to a band edge belongs to
    /// the next band, and alternates summing past 100 leave the base color
    /// with no band at all.
    fn pick_color(rng: &mut FlickerRng, group: &GroupConfig) -> Rgb {
        let draw = rng.next_below(100);
        let mut edge = 0u32;
        for mix in &group.alternates {
            edge += u32::from(mix.percent);
            if draw < edge {
                return mix.color;
            }
        }
        group.base
    }

    /// Darken each channel by an independent draw from the flicker range.
    ///
    /// Channels saturate at zero; flicker only ever subtracts.
    fn flicker(rng: &mut FlickerRng, color: Rgb, range: FlickerRange) -> Rgb {
        Rgb {
            r: color
                .r
                .saturating_sub(rng.range_inclusive(range.low(), range.high())),
            g: color
                .g
                .saturating_sub(rng.range_inclusive(range.low(), range.high())),
            b: color
                .b
                .saturating_sub(rng.range_inclusive(range.low(), range.high())),
        }
    }

    /// Draw the sleep before the next tick, uniform over the pacing range
    pub fn next_delay(&mut self, pacing: FramePacing) -> Duration {
        let min = pacing.min.as_millis();
        let max = pacing.max.as_millis().max(min);
        let span = u32::try_from(max - min + 1).unwrap_or(u32::MAX);
        Duration::from_millis(min + u64::from(self.rng.next_below(span)))
    }

    /// View of the frame buffer
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }
}

/// Animation loop driver: store + engine + output, one `tick` per frame
pub struct FlickerScheduler<'a, O: OutputDriver, const MAX_LEDS: usize> {
    store: &'a ConfigStore,
    engine: FlickerEngine<MAX_LEDS>,
    output: O,
    pacing: FramePacing,
}

impl<'a, O: OutputDriver, const MAX_LEDS: usize> FlickerScheduler<'a, O, MAX_LEDS> {
    pub fn new(store: &'a ConfigStore, output: O, pacing: FramePacing, seed: u64) -> Self {
        Self {
            store,
            engine: FlickerEngine::new(seed),
            output,
            pacing,
        }
    }

    /// One animation tick.
    ///
    /// The store lock is held for the render only; the frame write happens
    /// after release (the rendered buffer is a consistent snapshot), and the
    /// returned sleep is the caller's to take, outside any lock.
    pub fn tick(&mut self) -> Duration {
        let store = self.store;
        let engine = &mut self.engine;
        let rendered = store.with_lock(|config| engine.render(config));

        if let Some(len) = rendered {
            self.output.write(&self.engine.frame[..len]);
        }

        self.engine.next_delay(self.pacing)
    }

    /// Push an all-black frame immediately, without waiting for the next tick
    pub fn blank_now(&mut self) {
        let len = self.store.with_lock(|config| config.strip_len()).min(MAX_LEDS);
        self.engine.frame[..len].fill(BLACK);
        self.output.write(&self.engine.frame[..len]);
    }

    /// Get a reference to the output driver
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a reference to the frame renderer
    pub fn engine(&self) -> &FlickerEngine<MAX_LEDS> {
        &self.engine
    }

    /// One daylight gate update.
    ///
    /// Samples the sensor, advances the gate, and records the verdict in the
    /// store. On the OFF transition the strip is blanked right away rather
    /// than on the next frame. A failed sensor read skips the update and the
    /// previous gate state is retained.
    pub fn service_gate<S: LuxSensor>(
        &mut self,
        sensor: &mut S,
        gate: &mut DaylightGate,
    ) -> GateEvent {
        let Ok(lux) = sensor.read_lux() else {
            return GateEvent::Unchanged;
        };

        let event = gate.sample(lux);
        match event {
            GateEvent::TurnedOff => {
                self.store.set_lamp_on(false);
                self.blank_now();
                #[cfg(feature = "esp32-log")]
                println!("daylight gate: lamp off");
            }
            GateEvent::TurnedOn => {
                self.store.set_lamp_on(true);
                #[cfg(feature = "esp32-log")]
                println!("daylight gate: lamp on");
            }
            GateEvent::Unchanged => {}
        }
        event
    }
}
