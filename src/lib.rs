#![no_std]

pub mod color;
pub mod config;
pub mod console;
pub mod daylight;
pub mod engine;
pub mod rng;
pub mod store;

pub use color::{BLACK, Rgb, rgb_from_u32};
pub use config::{
    ColorMix, ConfigError, FlickerRange, FramePacing, GroupBounds, GroupConfig, LampConfig,
};
pub use console::{Command, HostAction, MixSlot, NamedColor, ParseError, Reply, handle_line};
pub use daylight::{DaylightConfig, DaylightGate, GateEvent};
pub use engine::{FlickerEngine, FlickerScheduler};
pub use rng::FlickerRng;
pub use store::ConfigStore;

pub use embassy_time::Duration;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The flicker engine is generic over this trait.
///
/// `write` receives one complete frame per call and is expected to latch it
/// onto the strip in a single transmission. Transport errors are handled
/// inside the driver; a dropped frame must not stop the caller's loop.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Abstract ambient light sensor trait
///
/// An `Err` from `read_lux` means the sample is unusable; the caller skips
/// that tick's gate update and the previous hysteresis state is retained.
pub trait LuxSensor {
    type Error;

    /// Read the current ambient light level in lux
    fn read_lux(&mut self) -> Result<f32, Self::Error>;
}
