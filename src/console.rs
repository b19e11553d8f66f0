//! Serial command interpreter.
//!
//! One newline-terminated ASCII command per call. Parsing is pure; applying
//! a command performs exactly one locked store update, so a concurrent
//! render pass sees every multi-field write as atomic. Line I/O, sleeping,
//! and the reboot primitive stay with the caller: the interpreter only hands
//! back reply text and an optional [`HostAction`].
//!
//! Malformed input (wrong argument count, non-numeric text, an inverted
//! flicker range) rejects the whole command and leaves the store unchanged.

use core::fmt::Write as _;
use core::str::SplitWhitespace;

use embassy_time::Duration;
use heapless::String;

use crate::color::Rgb;
use crate::config::FlickerRange;
use crate::store::ConfigStore;

/// Reply text capacity; `dump` and the help text are the longest replies
pub const REPLY_CAPACITY: usize = 1024;

// Stock profile slots the command vocabulary is bound to.
const FIRE_GROUP: usize = 0;
const SKULLS_GROUP: usize = 1;
const PURPLE_SLOT: usize = 0;
const RED_SLOT: usize = 1;

const LUX_SAMPLE_COUNT: u8 = 10;
const LUX_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

const HELP_TEXT: &str = "commands:
  bootsel                reboot into the bootloader
  dump                   print every tunable
  flicker <low> <high>   set the flicker range
  orange <r> <g> <b>     set the flame base color
  purple <r> <g> <b>     set the purple accent color
  red <r> <g> <b>        set the red accent color
  skulls <r> <g> <b>     set the skulls base color
  purple_pct <n>         purple accent chance in percent
  red_pct <n>            red accent chance in percent
  light_sensor | ls      print ambient light samples
";

const NAME_BOOTSEL: &str = "bootsel";
const NAME_DUMP: &str = "dump";
const NAME_FLICKER: &str = "flicker";
const NAME_ORANGE: &str = "orange";
const NAME_PURPLE: &str = "purple";
const NAME_RED: &str = "red";
const NAME_SKULLS: &str = "skulls";
const NAME_PURPLE_PCT: &str = "purple_pct";
const NAME_RED_PCT: &str = "red_pct";
const NAME_LIGHT_SENSOR: &str = "light_sensor";
const NAME_LIGHT_SENSOR_SHORT: &str = "ls";

/// Tunable colors addressable from the serial line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    /// Flame group base color
    Orange,
    /// Flame group first accent
    Purple,
    /// Flame group second accent
    Red,
    /// Skulls group base color
    Skulls,
}

impl NamedColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orange => NAME_ORANGE,
            Self::Purple => NAME_PURPLE,
            Self::Red => NAME_RED,
            Self::Skulls => NAME_SKULLS,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            NAME_ORANGE => Some(Self::Orange),
            NAME_PURPLE => Some(Self::Purple),
            NAME_RED => Some(Self::Red),
            NAME_SKULLS => Some(Self::Skulls),
            _ => None,
        }
    }
}

/// Tunable mix percentages addressable from the serial line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixSlot {
    PurplePct,
    RedPct,
}

impl MixSlot {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PurplePct => NAME_PURPLE_PCT,
            Self::RedPct => NAME_RED_PCT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            NAME_PURPLE_PCT => Some(Self::PurplePct),
            NAME_RED_PCT => Some(Self::RedPct),
            _ => None,
        }
    }
}

/// A fully parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bootsel,
    Dump,
    Flicker(FlickerRange),
    Color(NamedColor, Rgb),
    Percent(MixSlot, u8),
    LightSensor,
    /// Unrecognized command name; answered with the help text
    Help,
}

/// Reasons a recognized command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Fewer arguments than the command takes
    MissingArgument,
    /// More arguments than the command takes
    ExtraArgument,
    /// An argument that is not an integer
    NotANumber,
    /// A flicker range with low above high
    InvertedRange,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::MissingArgument => write!(f, "missing argument"),
            ParseError::ExtraArgument => write!(f, "too many arguments"),
            ParseError::NotANumber => write!(f, "argument is not a number"),
            ParseError::InvertedRange => write!(f, "low exceeds high"),
        }
    }
}

impl Command {
    /// Parse one line.
    ///
    /// Dispatch is on the exact first whitespace-separated token. An unknown
    /// name parses successfully as [`Command::Help`]; a known name with bad
    /// arguments is an error and must not touch the store.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(Self::Help);
        };

        if let Some(color) = NamedColor::parse_from_str(name) {
            let r = channel(int_arg(&mut tokens)?);
            let g = channel(int_arg(&mut tokens)?);
            let b = channel(int_arg(&mut tokens)?);
            end_of_args(&mut tokens)?;
            return Ok(Self::Color(color, Rgb { r, g, b }));
        }
        if let Some(slot) = MixSlot::parse_from_str(name) {
            let pct = percent(int_arg(&mut tokens)?);
            end_of_args(&mut tokens)?;
            return Ok(Self::Percent(slot, pct));
        }

        match name {
            NAME_BOOTSEL => {
                end_of_args(&mut tokens)?;
                Ok(Self::Bootsel)
            }
            NAME_DUMP => {
                end_of_args(&mut tokens)?;
                Ok(Self::Dump)
            }
            NAME_FLICKER => {
                let low = channel(int_arg(&mut tokens)?);
                let high = channel(int_arg(&mut tokens)?);
                end_of_args(&mut tokens)?;
                let range =
                    FlickerRange::new(low, high).map_err(|_| ParseError::InvertedRange)?;
                Ok(Self::Flicker(range))
            }
            NAME_LIGHT_SENSOR | NAME_LIGHT_SENSOR_SHORT => {
                end_of_args(&mut tokens)?;
                Ok(Self::LightSensor)
            }
            _ => Ok(Self::Help),
        }
    }
}

/// Side effects the owning execution context performs after a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Reset the device into its bootloader; does not return
    RebootToBootloader,
    /// Read and print `count` lux samples, `interval` apart
    SampleLux { count: u8, interval: Duration },
}

/// Interpreter output for one input line
#[derive(Debug)]
pub struct Reply {
    pub text: String<REPLY_CAPACITY>,
    pub action: Option<HostAction>,
}

/// Interpret one command line against the store.
///
/// Every store mutation happens inside a single `with_lock` call.
pub fn handle_line(line: &str, store: &ConfigStore) -> Reply {
    let mut reply = Reply {
        text: String::new(),
        action: None,
    };

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(err) => {
            let _ = writeln!(reply.text, "parse error: {err}");
            return reply;
        }
    };

    match command {
        Command::Bootsel => {
            let _ = writeln!(reply.text, "rebooting into bootloader");
            reply.action = Some(HostAction::RebootToBootloader);
        }
        Command::Dump => dump(store, &mut reply.text),
        Command::Flicker(range) => {
            store.with_lock(|config| config.set_flicker(range));
            let _ = writeln!(reply.text, "{} {} {}", NAME_FLICKER, range.low(), range.high());
        }
        Command::Color(name, rgb) => {
            let result = store.with_lock(|config| match name {
                NamedColor::Orange => config.set_base(FIRE_GROUP, rgb),
                NamedColor::Purple => config.set_alternate_color(FIRE_GROUP, PURPLE_SLOT, rgb),
                NamedColor::Red => config.set_alternate_color(FIRE_GROUP, RED_SLOT, rgb),
                NamedColor::Skulls => config.set_base(SKULLS_GROUP, rgb),
            });
            match result {
                Ok(()) => {
                    let _ = writeln!(
                        reply.text,
                        "{} {} {} {}",
                        name.as_str(),
                        rgb.r,
                        rgb.g,
                        rgb.b
                    );
                }
                Err(err) => {
                    let _ = writeln!(reply.text, "error: {err}");
                }
            }
        }
        Command::Percent(slot, pct) => {
            let result = store.with_lock(|config| match slot {
                MixSlot::PurplePct => {
                    config.set_alternate_percent(FIRE_GROUP, PURPLE_SLOT, pct)
                }
                MixSlot::RedPct => config.set_alternate_percent(FIRE_GROUP, RED_SLOT, pct),
            });
            match result {
                Ok(()) => {
                    let _ = writeln!(reply.text, "{} {}", slot.as_str(), pct);
                }
                Err(err) => {
                    let _ = writeln!(reply.text, "error: {err}");
                }
            }
        }
        Command::LightSensor => {
            reply.action = Some(HostAction::SampleLux {
                count: LUX_SAMPLE_COUNT,
                interval: LUX_SAMPLE_INTERVAL,
            });
        }
        Command::Help => {
            let _ = reply.text.push_str(HELP_TEXT);
        }
    }

    reply
}

/// Print every tunable in the fixed dump layout, one command-named line each.
///
/// The read is a single lock acquisition; the report therefore reflects the
/// last fully applied command for every field.
fn dump(store: &ConfigStore, text: &mut String<REPLY_CAPACITY>) {
    let config = store.snapshot();

    let fire = config.groups.first();
    if let Some(fire) = fire {
        let base = fire.base;
        let _ = writeln!(text, "{} {} {} {}", NAME_ORANGE, base.r, base.g, base.b);
        if let Some(purple) = fire.alternates.get(PURPLE_SLOT) {
            let c = purple.color;
            let _ = writeln!(text, "{} {} {} {}", NAME_PURPLE, c.r, c.g, c.b);
        }
        if let Some(red) = fire.alternates.get(RED_SLOT) {
            let c = red.color;
            let _ = writeln!(text, "{} {} {} {}", NAME_RED, c.r, c.g, c.b);
        }
    }
    if let Some(skulls) = config.groups.get(SKULLS_GROUP) {
        let base = skulls.base;
        let _ = writeln!(text, "{} {} {} {}", NAME_SKULLS, base.r, base.g, base.b);
    }
    if let Some(fire) = fire {
        let _ = writeln!(
            text,
            "{} {} {}",
            NAME_FLICKER,
            fire.flicker.low(),
            fire.flicker.high()
        );
        if let Some(purple) = fire.alternates.get(PURPLE_SLOT) {
            let _ = writeln!(text, "{} {}", NAME_PURPLE_PCT, purple.percent);
        }
        if let Some(red) = fire.alternates.get(RED_SLOT) {
            let _ = writeln!(text, "{} {}", NAME_RED_PCT, red.percent);
        }
    }
    let _ = writeln!(text, "paused {}", if config.paused { "yes" } else { "no" });
}

fn int_arg(tokens: &mut SplitWhitespace<'_>) -> Result<i32, ParseError> {
    tokens
        .next()
        .ok_or(ParseError::MissingArgument)?
        .parse()
        .map_err(|_| ParseError::NotANumber)
}

fn end_of_args(tokens: &mut SplitWhitespace<'_>) -> Result<(), ParseError> {
    if tokens.next().is_some() {
        return Err(ParseError::ExtraArgument);
    }
    Ok(())
}

/// Clamp a parsed value to a color channel, per set-time clamping rules
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Clamp a parsed value to a percentage
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}
