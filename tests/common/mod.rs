//! Shared test infrastructure for ember-flicker integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use ember_flicker::{LuxSensor, OutputDriver, Rgb};

/// Mock strip that records every frame written to it
pub struct MockStrip {
    frames: Vec<Vec<Rgb>>,
}

impl MockStrip {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> Option<&[Rgb]> {
        self.frames.last().map(Vec::as_slice)
    }

    pub fn frames(&self) -> &[Vec<Rgb>] {
        &self.frames
    }
}

impl OutputDriver for MockStrip {
    fn write(&mut self, colors: &[Rgb]) {
        self.frames.push(colors.to_vec());
    }
}

/// Sensor that always reports the same lux level
pub struct ConstLux(pub f32);

impl LuxSensor for ConstLux {
    type Error = ();

    fn read_lux(&mut self) -> Result<f32, ()> {
        Ok(self.0)
    }
}

/// Sensor whose every read fails
pub struct FailingLux;

impl LuxSensor for FailingLux {
    type Error = ();

    fn read_lux(&mut self) -> Result<f32, ()> {
        Err(())
    }
}

/// Count how many pixels of `frame` equal `color`
pub fn count_pixels(frame: &[Rgb], color: Rgb) -> usize {
    frame.iter().filter(|&&pixel| pixel == color).count()
}
