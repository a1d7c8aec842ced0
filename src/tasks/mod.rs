pub mod actuation;
pub mod presentation;
pub mod sampling;

pub use actuation::{ActuationState, ActuationTask};
pub use presentation::{PresentationTask, format_reading};
pub use sampling::{SampleOutcome, SamplingStats, SamplingTask};

use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};

/// A controller task: one iteration of an endless loop.
///
/// Production code calls [`Task::run`]. Tests drive a task a fixed number of iterations with
/// [`Task::run_for`] or stop it from the outside with [`Task::run_until`].
#[allow(async_fn_in_trait)]
pub trait Task {
    /// Run one loop iteration, including any sleep at the end of it
    async fn step(&mut self);

    async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    async fn run_for(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step().await;
        }
    }

    /// Loop until `stop` is signalled. The signal is raced against the iteration in progress, so
    /// a task parked on a blocking receive or a sleep returns promptly. Each task needs its own
    /// signal since waiting consumes it.
    async fn run_until<M: RawMutex>(&mut self, stop: &Signal<M, ()>) {
        loop {
            if let Either::First(()) = select(stop.wait(), self.step()).await {
                return;
            }
        }
    }
}
