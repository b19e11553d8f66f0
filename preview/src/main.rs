//! Terminal preview app for the ember-flicker engine
//!
//! Runs the real two-context wiring on a desktop: one thread ticks the
//! animation scheduler and draws the strip as ANSI color blocks, the main
//! thread reads command lines from stdin and mutates the shared store. Type
//! `dump`, `flicker 5 60`, `orange 255 80 0`, ... exactly as over serial.

use std::io::{BufRead, Write as _, stdin, stdout};
use std::time::{SystemTime, UNIX_EPOCH};
use std::{process, thread};

use ember_flicker::{
    ConfigStore, DaylightConfig, DaylightGate, FlickerScheduler, FramePacing, HostAction,
    LampConfig, LuxSensor, OutputDriver, Rgb, handle_line,
};

/// Renderer frame buffer capacity
const MAX_LEDS: usize = 64;

const FIRE_LEDS: u8 = 10;
const SKULL_LEDS: u8 = 8;

/// Simulated ambient light level: a dark room, so the gate keeps the lamp on
const SIM_LUX: f32 = 5.0;

/// Strip "hardware" that redraws one terminal line per frame
struct TerminalStrip;

impl OutputDriver for TerminalStrip {
    fn write(&mut self, colors: &[Rgb]) {
        let mut line = String::from("\r");
        for color in colors {
            line.push_str(&format!(
                "\x1b[38;2;{};{};{}m\u{2588}\u{2588}",
                color.r, color.g, color.b
            ));
        }
        line.push_str("\x1b[0m");
        print!("{line}");
        let _ = stdout().flush();
    }
}

/// Fixed-value stand-in for the lux sensor
struct SimLux;

impl LuxSensor for SimLux {
    type Error = std::convert::Infallible;

    fn read_lux(&mut self) -> Result<f32, Self::Error> {
        Ok(SIM_LUX)
    }
}

fn main() {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(1))
        .unwrap_or(1);

    let store: &'static ConfigStore = Box::leak(Box::new(ConfigStore::new(
        LampConfig::halloween(FIRE_LEDS, SKULL_LEDS),
    )));

    // Animation context: gate update, render tick, randomized sleep.
    thread::spawn(move || {
        let mut scheduler: FlickerScheduler<'_, TerminalStrip, MAX_LEDS> =
            FlickerScheduler::new(store, TerminalStrip, FramePacing::default(), seed);
        let mut gate = DaylightGate::new(DaylightConfig::default());
        let mut sensor = SimLux;

        loop {
            scheduler.service_gate(&mut sensor, &mut gate);
            let delay = scheduler.tick();
            thread::sleep(std::time::Duration::from_millis(delay.as_millis()));
        }
    });

    // Command context: blocking line reads, one dispatch per line.
    for line in stdin().lock().lines() {
        let Ok(line) = line else { break };
        let reply = handle_line(&line, store);
        print!("\n{}", reply.text);

        match reply.action {
            Some(HostAction::RebootToBootloader) => {
                println!("(preview) bootloader reset requested, exiting");
                process::exit(0);
            }
            Some(HostAction::SampleLux { count, interval }) => {
                let mut sensor = SimLux;
                for _ in 0..count {
                    match sensor.read_lux() {
                        Ok(lux) => println!("{lux:.1} lux"),
                        Err(_) => println!("sensor read failed"),
                    }
                    thread::sleep(std::time::Duration::from_millis(interval.as_millis()));
                }
            }
            None => {}
        }
    }
}
