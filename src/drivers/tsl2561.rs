//! Async driver for the TAOS/AMS TSL2561 light-to-digital converter.
//!
//! The sensor is powered up once in [`LightSensor::init`], which returns after the first
//! integration cycle has completed. From then on it integrates continuously, so a read is just two
//! word reads of the channel registers. Lux is computed with the integer
//! approximation from the datasheet for the T, FN and CL packages.

use embedded_hal::i2c::Error as _;
use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use super::sensor::LightSensor;
use crate::error::SensorError;

/// Address with the ADDR SEL pin left floating
pub const DEFAULT_ADDRESS: u8 = 0x39;

/// Reported when either channel is clipped. Matches what the reference drivers return.
pub const SATURATED_LUX: u32 = 65_536;

const COMMAND: u8 = 0x80;
const WORD: u8 = 0x20;

const REG_CONTROL: u8 = 0x00;
const REG_TIMING: u8 = 0x01;
const REG_ID: u8 = 0x0A;
const REG_DATA0: u8 = 0x0C;
const REG_DATA1: u8 = 0x0E;

const POWER_ON: u8 = 0x03;
const TIMING_HIGH_GAIN: u8 = 0x10;

const LUX_SCALE: u32 = 14;
const RATIO_SCALE: u32 = 9;
const CH_SCALE: u32 = 10;
const CH_SCALE_TINT_13MS: u64 = 0x7517;
const CH_SCALE_TINT_101MS: u64 = 0x0FE7;

/// Piecewise-linear coefficients `(k, b, m)`: for `ratio <= k`, `lux = ch0 * b - ch1 * m`
const T_PACKAGE_COEFFICIENTS: [(u64, u64, u64); 7] = [
    (0x0040, 0x01f2, 0x01be),
    (0x0080, 0x0214, 0x02d1),
    (0x00c0, 0x023f, 0x037b),
    (0x0100, 0x0270, 0x03fe),
    (0x0138, 0x016f, 0x01fc),
    (0x019a, 0x00d2, 0x00fb),
    (0x029a, 0x0018, 0x0012),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 1x, for bright environments
    #[default]
    Low,
    /// 16x, for dim environments
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntegrationTime {
    Ms13 = 0,
    Ms101 = 1,
    #[default]
    Ms402 = 2,
}

impl IntegrationTime {
    /// Length of one integration cycle, rounded up to whole milliseconds
    pub const fn millis(self) -> u32 {
        match self {
            IntegrationTime::Ms13 => 14,
            IntegrationTime::Ms101 => 101,
            IntegrationTime::Ms402 => 402,
        }
    }

    /// Raw count above which a channel is considered saturated
    const fn clip_threshold(self) -> u16 {
        match self {
            IntegrationTime::Ms13 => 4900,
            IntegrationTime::Ms101 => 37000,
            IntegrationTime::Ms402 => 65000,
        }
    }

    /// Scale factor that normalises a channel count to the nominal 402 ms integration
    const fn channel_scale(self) -> u64 {
        match self {
            IntegrationTime::Ms13 => CH_SCALE_TINT_13MS,
            IntegrationTime::Ms101 => CH_SCALE_TINT_101MS,
            IntegrationTime::Ms402 => 1 << CH_SCALE,
        }
    }
}

/// Convert raw channel counts to lux.
///
/// # Parameters
/// * `broadband` - Channel 0 count (visible and infrared)
/// * `infrared` - Channel 1 count (infrared only)
/// * `gain` - The gain the counts were taken with
/// * `integration` - The integration time the counts were taken with
pub fn calculate_lux(
    broadband: u16,
    infrared: u16,
    gain: Gain,
    integration: IntegrationTime,
) -> u32 {
    let clip = integration.clip_threshold();
    if broadband > clip || infrared > clip {
        return SATURATED_LUX;
    }

    let mut scale = integration.channel_scale();
    if gain == Gain::Low {
        scale <<= 4;
    }

    let channel0 = (u64::from(broadband) * scale) >> CH_SCALE;
    let channel1 = (u64::from(infrared) * scale) >> CH_SCALE;

    let ratio = if channel0 == 0 {
        0
    } else {
        let ratio = (channel1 << (RATIO_SCALE + 1)) / channel0;
        (ratio + 1) >> 1
    };

    let (b, m) = T_PACKAGE_COEFFICIENTS
        .iter()
        .find(|(k, _, _)| ratio <= *k)
        .map(|&(_, b, m)| (b, m))
        .unwrap_or((0, 0));

    let lux = (channel0 * b).saturating_sub(channel1 * m);
    let lux = (lux + (1 << (LUX_SCALE - 1))) >> LUX_SCALE;
    u32::try_from(lux).unwrap_or(u32::MAX)
}

/// Holds the bus handle and measurement settings for one TSL2561
pub struct Tsl2561<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    gain: Gain,
    integration: IntegrationTime,
    initialised: bool,
}

impl<I2C: I2c, D: DelayNs> Tsl2561<I2C, D> {
    /// Create a driver at the default address with 1x gain and 402 ms integration.
    ///
    /// # Parameters
    /// * `i2c` - The bus (or shared bus device) the sensor is attached to
    /// * `delay` - Used to wait out the first integration cycle after power-on
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_settings(
            i2c,
            delay,
            DEFAULT_ADDRESS,
            Gain::default(),
            IntegrationTime::default(),
        )
    }

    pub fn with_settings(
        i2c: I2C,
        delay: D,
        address: u8,
        gain: Gain,
        integration: IntegrationTime,
    ) -> Self {
        Self {
            i2c,
            delay,
            address,
            gain,
            integration,
            initialised: false,
        }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn timing(&self) -> u8 {
        let gain = match self.gain {
            Gain::Low => 0,
            Gain::High => TIMING_HIGH_GAIN,
        };
        gain | self.integration as u8
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[COMMAND | register, value])
            .await
            .map_err(|e| SensorError::Bus(e.kind()))
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[COMMAND | register], &mut buf)
            .await
            .map_err(|e| SensorError::Bus(e.kind()))?;
        Ok(buf[0])
    }

    async fn read_word(&mut self, register: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[COMMAND | WORD | register], &mut buf)
            .await
            .map_err(|e| SensorError::Bus(e.kind()))?;
        Ok(u16::from_le_bytes(buf))
    }
}

impl<I2C: I2c, D: DelayNs> LightSensor for Tsl2561<I2C, D> {
    async fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(REG_ID).await?;
        // PARTNO lives in the high nibble: TSL2560/1 in CS (0x0, 0x1) or T/FN/CL (0x4, 0x5)
        if !matches!(id >> 4, 0x0 | 0x1 | 0x4 | 0x5) {
            return Err(SensorError::UnknownDevice(id));
        }
        self.write_register(REG_CONTROL, POWER_ON).await?;
        let timing = self.timing();
        self.write_register(REG_TIMING, timing).await?;
        // Both channels read zero until the first cycle completes
        self.delay.delay_ms(self.integration.millis()).await;
        self.initialised = true;
        debug!("TSL2561: id {} timing {}", id, timing);
        Ok(())
    }

    async fn read_lux(&mut self) -> Result<u32, SensorError> {
        if !self.initialised {
            return Err(SensorError::NotInitialised);
        }
        let broadband = self.read_word(REG_DATA0).await?;
        let infrared = self.read_word(REG_DATA1).await?;
        trace!("TSL2561: ch0 {} ch1 {}", broadband, infrared);
        Ok(calculate_lux(broadband, infrared, self.gain, self.integration))
    }
}
