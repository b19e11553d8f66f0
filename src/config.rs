//! Shared configuration model for the flicker lamp.
//!
//! Plain value types plus the [`LampConfig`] aggregate that both execution
//! contexts share through [`crate::ConfigStore`]. Validation happens at
//! configuration-set time; the render path never sees an invalid aggregate.

use embassy_time::Duration;
use heapless::Vec;

use crate::color::Rgb;

/// Maximum number of independently configured LED groups
pub const MAX_GROUPS: usize = 4;

/// Maximum number of alternate colors per group
pub const MAX_ALTERNATES: usize = 2;

// Stock lamp profile. Base flame color and flicker depth follow the original
// candle tuning; purple/red accents are the seasonal mix-ins.
const FIRE_BASE: Rgb = Rgb { r: 226, g: 121, b: 35 };
const FIRE_PURPLE: Rgb = Rgb { r: 158, g: 8, b: 148 };
const FIRE_RED: Rgb = Rgb { r: 200, g: 12, b: 12 };
const SKULL_BASE: Rgb = Rgb {
    r: 180,
    g: 180,
    b: 190,
};

const FIRE_FLICKER: FlickerRange = FlickerRange { low: 0, high: 55 };
const SKULL_FLICKER: FlickerRange = FlickerRange { low: 0, high: 25 };

const DEFAULT_PURPLE_PCT: u8 = 3;
const DEFAULT_RED_PCT: u8 = 12;

const SLEEP_LOW_MS: u64 = 10;
const SLEEP_HIGH_MS: u64 = 100;

/// Errors produced by configuration-set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A flicker range with `low > high`
    InvertedRange,
    /// Group index outside the configured group list
    NoSuchGroup,
    /// Alternate slot index outside the group's alternate list
    NoSuchSlot,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvertedRange => write!(f, "flicker range low exceeds high"),
            ConfigError::NoSuchGroup => write!(f, "no such LED group"),
            ConfigError::NoSuchSlot => write!(f, "no such alternate color slot"),
        }
    }
}

/// Magnitude range for the per-channel random subtraction.
///
/// Invariant: `low <= high`, enforced at construction. An inverted pair is an
/// input validation error, not a request to swap the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlickerRange {
    low: u8,
    high: u8,
}

impl FlickerRange {
    pub fn new(low: u8, high: u8) -> Result<Self, ConfigError> {
        if low > high {
            return Err(ConfigError::InvertedRange);
        }
        Ok(Self { low, high })
    }

    /// The `[0, high]` form used where no low bound is exposed
    pub const fn up_to(high: u8) -> Self {
        Self { low: 0, high }
    }

    pub const fn low(self) -> u8 {
        self.low
    }

    pub const fn high(self) -> u8 {
        self.high
    }
}

/// An alternate color with its selection chance in percent.
///
/// Percentages are clamped to `[0, 100]` when set. A group whose alternates
/// sum past 100 simply never renders its base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMix {
    pub color: Rgb,
    pub percent: u8,
}

/// Half-open LED index range covered by one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GroupBounds {
    pub start: u8,
    pub end: u8,
}

impl GroupBounds {
    /// Get the number of LEDs in the group
    pub const fn count(self) -> u8 {
        self.end.saturating_sub(self.start)
    }
}

/// One LED group: its strip slice, color set, and flicker depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    pub bounds: GroupBounds,
    pub base: Rgb,
    pub alternates: Vec<ColorMix, MAX_ALTERNATES>,
    pub flicker: FlickerRange,
}

/// Inter-frame sleep range for the animation loop
#[derive(Debug, Clone, Copy)]
pub struct FramePacing {
    pub min: Duration,
    pub max: Duration,
}

impl Default for FramePacing {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(SLEEP_LOW_MS),
            max: Duration::from_millis(SLEEP_HIGH_MS),
        }
    }
}

/// The shared tunable aggregate.
///
/// Exactly one instance exists per lamp, owned by a [`crate::ConfigStore`].
/// `lamp_on` is written only by the daylight gate; the command interpreter
/// mutates everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LampConfig {
    pub groups: Vec<GroupConfig, MAX_GROUPS>,
    pub paused: bool,
    pub lamp_on: bool,
}

impl LampConfig {
    /// Stock two-group profile: a flame group followed by a skulls group.
    ///
    /// `fire_leds` LEDs of flame starting at index 0, then `skull_leds` LEDs
    /// of dimly flickering bone white.
    pub fn halloween(fire_leds: u8, skull_leds: u8) -> Self {
        let mut alternates = Vec::new();
        let _ = alternates.push(ColorMix {
            color: FIRE_PURPLE,
            percent: DEFAULT_PURPLE_PCT,
        });
        let _ = alternates.push(ColorMix {
            color: FIRE_RED,
            percent: DEFAULT_RED_PCT,
        });

        let mut groups: Vec<GroupConfig, MAX_GROUPS> = Vec::new();
        let _ = groups.push(GroupConfig {
            bounds: GroupBounds {
                start: 0,
                end: fire_leds,
            },
            base: FIRE_BASE,
            alternates,
            flicker: FIRE_FLICKER,
        });
        if skull_leds > 0 {
            let _ = groups.push(GroupConfig {
                bounds: GroupBounds {
                    start: fire_leds,
                    end: fire_leds.saturating_add(skull_leds),
                },
                base: SKULL_BASE,
                alternates: Vec::new(),
                flicker: SKULL_FLICKER,
            });
        }

        Self {
            groups,
            paused: false,
            lamp_on: true,
        }
    }

    /// Total strip length implied by the group bounds
    pub fn strip_len(&self) -> usize {
        self.groups
            .iter()
            .map(|g| usize::from(g.bounds.end))
            .max()
            .unwrap_or(0)
    }

    /// Set every group's flicker range in one update
    pub fn set_flicker(&mut self, range: FlickerRange) {
        for group in &mut self.groups {
            group.flicker = range;
        }
    }

    /// Replace a group's base color
    pub fn set_base(&mut self, group: usize, color: Rgb) -> Result<(), ConfigError> {
        let group = self.groups.get_mut(group).ok_or(ConfigError::NoSuchGroup)?;
        group.base = color;
        Ok(())
    }

    /// Replace one alternate color, keeping its percentage
    pub fn set_alternate_color(
        &mut self,
        group: usize,
        slot: usize,
        color: Rgb,
    ) -> Result<(), ConfigError> {
        let group = self.groups.get_mut(group).ok_or(ConfigError::NoSuchGroup)?;
        let mix = group.alternates.get_mut(slot).ok_or(ConfigError::NoSuchSlot)?;
        mix.color = color;
        Ok(())
    }

    /// Set one alternate's selection chance, clamped to 100
    pub fn set_alternate_percent(
        &mut self,
        group: usize,
        slot: usize,
        percent: u8,
    ) -> Result<(), ConfigError> {
        let group = self.groups.get_mut(group).ok_or(ConfigError::NoSuchGroup)?;
        let mix = group.alternates.get_mut(slot).ok_or(ConfigError::NoSuchSlot)?;
        mix.percent = percent.min(100);
        Ok(())
    }
}
