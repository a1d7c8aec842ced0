use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use embedded_hal::digital::StatefulOutputPin;
use embedded_hal_async::delay::DelayNs;

use super::Task;
use crate::{Reading, channel::ReadingChannel, config::BlinkPolicy};

/// State owned by the actuation task alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationState {
    /// The most recent reading this task managed to receive
    pub last_reading: Reading,
    /// Sleep between toggles, derived from `last_reading`
    pub blink_interval: Duration,
}

impl ActuationState {
    pub fn new(policy: &BlinkPolicy) -> Self {
        Self {
            last_reading: Reading::ZERO,
            blink_interval: policy.blink_interval(Reading::ZERO.lux),
        }
    }
}

/// Blinks the status LED at a rate chosen by the latest known brightness.
///
/// Each iteration polls the channel without waiting, keeps the previous reading when nothing
/// new arrived, picks the interval for the reading's band, toggles the LED and sleeps that
/// interval. A full on/off cycle therefore takes twice the interval.
pub struct ActuationTask<'a, P, D, M: RawMutex, const N: usize> {
    led: P,
    delay: D,
    channel: &'a ReadingChannel<M, N>,
    policy: BlinkPolicy,
    state: ActuationState,
}

impl<'a, P, D, M, const N: usize> ActuationTask<'a, P, D, M, N>
where
    P: StatefulOutputPin,
    D: DelayNs,
    M: RawMutex,
{
    /// # Parameters
    /// * `led` - The status indicator output
    /// * `delay` - Sleep provider for the blink interval
    /// * `channel` - Polled for fresh readings
    /// * `policy` - Maps lux to blink interval
    pub fn new(led: P, delay: D, channel: &'a ReadingChannel<M, N>, policy: BlinkPolicy) -> Self {
        Self {
            led,
            delay,
            channel,
            policy,
            state: ActuationState::new(&policy),
        }
    }

    pub fn state(&self) -> &ActuationState {
        &self.state
    }

    /// Take a waiting reading if there is one and recompute the blink interval.
    /// Returns `true` when a fresh reading arrived.
    pub fn poll(&mut self) -> bool {
        let fresh = match self.channel.try_receive() {
            Some(reading) => {
                self.state.last_reading = reading;
                true
            }
            None => false,
        };
        self.state.blink_interval = self.policy.blink_interval(self.state.last_reading.lux);
        fresh
    }
}

impl<P, D, M, const N: usize> Task for ActuationTask<'_, P, D, M, N>
where
    P: StatefulOutputPin,
    D: DelayNs,
    M: RawMutex,
{
    async fn step(&mut self) {
        if self.poll() {
            trace!(
                "LED: {} lux, toggling every {} ms",
                self.state.last_reading.lux,
                self.state.blink_interval.as_millis()
            );
        }
        if self.led.toggle().is_err() {
            warn!("LED: toggle failed");
        }
        let interval_ms = u32::try_from(self.state.blink_interval.as_millis()).unwrap_or(u32::MAX);
        self.delay.delay_ms(interval_ms).await;
    }
}
