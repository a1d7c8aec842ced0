//! Error types for the controller.
//!
//! Steady-state errors ([`SensorError`], [`ChannelFull`], [`DisplayError`]) are absorbed by the
//! task loops. [`InitError`] is only produced during start-up and is terminal.

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

use crate::Reading;

/// A light sensor could not be initialised or read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    #[error("sensor bus error: {0:?}")]
    Bus(ErrorKind),
    #[error("unexpected sensor id register value {0:#04x}")]
    UnknownDevice(u8),
    #[error("sensor read before initialisation")]
    NotInitialised,
}

/// The reading channel was at capacity. The rejected reading is handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("reading channel full, {0:?} not queued")]
pub struct ChannelFull(pub Reading);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The display did not accept a command or frame
    #[error("display interface error")]
    Interface,
    #[error("cursor ({row}, {col}) is outside the display")]
    CursorOutOfRange { row: u8, col: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("sample period must be non-zero")]
    ZeroSamplePeriod,
    #[error("blink intervals must be non-zero")]
    ZeroBlinkInterval,
    #[error("dark threshold {dark} lux is above bright threshold {bright} lux")]
    InvertedThresholds { dark: u32, bright: u32 },
}

/// Any failure while bringing the system up. There is no recovery from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("light sensor: {0}")]
    Sensor(#[from] SensorError),
    #[error("display: {0}")]
    Display(#[from] DisplayError),
}
