use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use super::Task;
use crate::{
    Reading, channel::ReadingChannel, drivers::LightSensor, error::ChannelFull,
    error::SensorError,
};

/// What happened to one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleOutcome {
    /// Queued for the consumers
    Published(Reading),
    /// Read fine but the channel was full, so it was discarded
    Dropped(Reading),
    /// The sensor read failed and nothing was published this cycle
    SensorFailed(SensorError),
}

/// Running totals since the task was created. Counters wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingStats {
    pub published: u32,
    pub dropped: u32,
    pub sensor_errors: u32,
}

/// The single producer. Reads the sensor, publishes best effort, then sleeps a fixed period.
///
/// A failed read skips publication for the cycle and a full channel drops the reading. Neither
/// is retried since a fresher sample follows one period later.
pub struct SamplingTask<'a, S, D, M: RawMutex, const N: usize> {
    sensor: S,
    delay: D,
    channel: &'a ReadingChannel<M, N>,
    period_ms: u32,
    stats: SamplingStats,
}

impl<'a, S, D, M, const N: usize> SamplingTask<'a, S, D, M, N>
where
    S: LightSensor,
    D: DelayNs,
    M: RawMutex,
{
    /// # Parameters
    /// * `sensor` - An initialised light sensor
    /// * `delay` - Sleep provider for the sample period
    /// * `channel` - Where readings are published
    /// * `period_ms` - Sleep after each sample
    pub fn new(sensor: S, delay: D, channel: &'a ReadingChannel<M, N>, period_ms: u32) -> Self {
        Self {
            sensor,
            delay,
            channel,
            period_ms,
            stats: SamplingStats::default(),
        }
    }

    pub fn stats(&self) -> SamplingStats {
        self.stats
    }

    /// Read the sensor once and try to publish the result
    pub async fn sample(&mut self) -> SampleOutcome {
        let reading = match self.sensor.read_lux().await {
            Ok(lux) => Reading::new(lux),
            Err(e) => {
                self.stats.sensor_errors = self.stats.sensor_errors.wrapping_add(1);
                warn!("SAMPLING: sensor read failed: {:?}", e);
                return SampleOutcome::SensorFailed(e);
            }
        };

        match self.channel.publish(reading) {
            Ok(()) => {
                self.stats.published = self.stats.published.wrapping_add(1);
                trace!("SAMPLING: published {} lux", reading.lux);
                SampleOutcome::Published(reading)
            }
            Err(ChannelFull(reading)) => {
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                debug!("SAMPLING: channel full, dropped {} lux", reading.lux);
                SampleOutcome::Dropped(reading)
            }
        }
    }
}

impl<S, D, M, const N: usize> Task for SamplingTask<'_, S, D, M, N>
where
    S: LightSensor,
    D: DelayNs,
    M: RawMutex,
{
    async fn step(&mut self) {
        self.sample().await;
        self.delay.delay_ms(self.period_ms).await;
    }
}
