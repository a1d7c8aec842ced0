//! Start-up configuration. All values are fixed for the lifetime of the process.

use embassy_time::Duration;

use crate::error::ConfigError;

/// Readings the channel holds before further publishes are dropped
pub const QUEUE_CAPACITY: usize = 5;

/// Brightness band of a reading. Each band maps to one blink interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightBand {
    /// Below the dark threshold: slow blink
    Dark,
    /// Between the thresholds, both inclusive
    Moderate,
    /// Above the bright threshold: fast blink
    Bright,
}

/// Maps the latest lux value to the status LED blink interval.
///
/// `lux > bright_threshold_lux` is bright, `lux < dark_threshold_lux` is dark, everything else is
/// moderate. There is no hysteresis, so a reading that sits on a boundary can flip the interval
/// every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPolicy {
    pub bright_threshold_lux: u32,
    pub dark_threshold_lux: u32,
    pub bright_blink_ms: u32,
    pub moderate_blink_ms: u32,
    pub dark_blink_ms: u32,
}

impl BlinkPolicy {
    pub const DEFAULT: BlinkPolicy = BlinkPolicy {
        bright_threshold_lux: 5000,
        dark_threshold_lux: 1000,
        bright_blink_ms: 200,
        moderate_blink_ms: 500,
        dark_blink_ms: 800,
    };

    pub const fn classify(&self, lux: u32) -> LightBand {
        if lux > self.bright_threshold_lux {
            LightBand::Bright
        } else if lux < self.dark_threshold_lux {
            LightBand::Dark
        } else {
            LightBand::Moderate
        }
    }

    pub const fn band_interval_ms(&self, band: LightBand) -> u32 {
        match band {
            LightBand::Bright => self.bright_blink_ms,
            LightBand::Moderate => self.moderate_blink_ms,
            LightBand::Dark => self.dark_blink_ms,
        }
    }

    /// The time between LED toggles for a reading of `lux`
    pub const fn blink_interval(&self, lux: u32) -> Duration {
        Duration::from_millis(self.band_interval_ms(self.classify(lux)) as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bright_blink_ms == 0 || self.moderate_blink_ms == 0 || self.dark_blink_ms == 0 {
            return Err(ConfigError::ZeroBlinkInterval);
        }
        if self.dark_threshold_lux > self.bright_threshold_lux {
            return Err(ConfigError::InvertedThresholds {
                dark: self.dark_threshold_lux,
                bright: self.bright_threshold_lux,
            });
        }
        Ok(())
    }
}

impl Default for BlinkPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Delay between the end of one sensor read and the start of the next
    pub sample_period_ms: u32,
    pub blink: BlinkPolicy,
}

impl Config {
    pub const DEFAULT: Config = Config {
        sample_period_ms: 1000,
        blink: BlinkPolicy::DEFAULT,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_period_ms == 0 {
            return Err(ConfigError::ZeroSamplePeriod);
        }
        self.blink.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
