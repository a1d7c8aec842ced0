use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, TrySendError},
};

use crate::{Reading, error::ChannelFull};

/// Fixed-capacity FIFO carrying readings from the sampling task to its consumers.
///
/// Every consumer shares the one queue, so each reading goes to exactly one receive call. When
/// the presentation and actuation tasks both wait on it, whichever polls first wins the item.
/// All locking stays inside the channel, behind the raw mutex `M`.
pub struct ReadingChannel<M: RawMutex, const N: usize> {
    inner: Channel<M, Reading, N>,
}

impl<M: RawMutex, const N: usize> ReadingChannel<M, N> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Queue a reading without waiting. A full channel hands the reading straight back.
    pub fn publish(&self, reading: Reading) -> Result<(), ChannelFull> {
        self.inner.try_send(reading).map_err(|e| match e {
            TrySendError::Full(reading) => ChannelFull(reading),
        })
    }

    /// Wait, with no timeout, for the oldest queued reading and take it
    pub async fn receive(&self) -> Reading {
        self.inner.receive().await
    }

    /// Take the oldest queued reading if there is one
    pub fn try_receive(&self) -> Option<Reading> {
        self.inner.try_receive().ok()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }
}

impl<M: RawMutex, const N: usize> Default for ReadingChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
