#![cfg_attr(not(test), no_std)]

// Declared first so the logging macros are in scope for every module below.
#[macro_use]
mod fmt;

pub mod channel;
pub mod config;
pub mod drivers;
pub mod error;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::ReadingChannel;
pub use config::{BlinkPolicy, Config, LightBand, QUEUE_CAPACITY};
pub use error::{ChannelFull, ConfigError, DisplayError, InitError, SensorError};
pub use tasks::*;

/// The number of visible characters per display line
pub const DISPLAY_COLUMNS: usize = 16;

/// The number of text lines on the display
pub const DISPLAY_ROWS: usize = 2;

/// One ambient light sample. Small enough to move by value through the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub lux: u32,
}

impl Reading {
    /// The reading assumed before the first sample arrives
    pub const ZERO: Reading = Reading { lux: 0 };

    pub const fn new(lux: u32) -> Self {
        Self { lux }
    }
}

impl From<u32> for Reading {
    fn from(lux: u32) -> Self {
        Self { lux }
    }
}
