//! Host-side fakes for the hardware seams. Each fake is `Clone` and shares its record, so a test
//! keeps one handle and gives the other to the task under test.

use std::{
    collections::VecDeque,
    string::String,
    sync::{Arc, Mutex},
    vec::Vec,
};

use embassy_futures::yield_now;
use embedded_hal::{
    digital::{ErrorType, OutputPin, StatefulOutputPin},
    i2c::ErrorKind,
};
use embedded_hal_async::delay::DelayNs;

use crate::{
    drivers::{LightSensor, TextDisplay, display::check_cursor},
    error::{DisplayError, SensorError},
};

/// Records requested sleeps instead of sleeping. Each sleep yields once so that concurrently
/// joined futures get a turn.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    sleeps: Arc<Mutex<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps_ms(&self) -> Vec<u32> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleeps.lock().unwrap().push(ns / 1_000_000);
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleeps.lock().unwrap().push(ms);
        yield_now().await;
    }
}

/// Replays a fixed script of read results, then reports a bus error forever
pub struct ScriptedSensor {
    script: VecDeque<Result<u32, SensorError>>,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Result<u32, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl LightSensor for ScriptedSensor {
    async fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    async fn read_lux(&mut self) -> Result<u32, SensorError> {
        self.script
            .pop_front()
            .unwrap_or(Err(SensorError::Bus(ErrorKind::Other)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    SetCursor(u8, u8),
    Print(String),
}

#[derive(Default)]
struct DisplayLog {
    ops: Vec<DisplayOp>,
    fail_next_print: bool,
}

/// Logs every display call in order
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    log: Arc<Mutex<DisplayLog>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<DisplayOp> {
        self.log.lock().unwrap().ops.clone()
    }

    pub fn last_print(&self) -> Option<String> {
        self.log
            .lock()
            .unwrap()
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                DisplayOp::Print(text) => Some(text.clone()),
                _ => None,
            })
    }

    /// Make the next `print` fail without recording it
    pub fn fail_next_print(&self) {
        self.log.lock().unwrap().fail_next_print = true;
    }
}

impl TextDisplay for RecordingDisplay {
    async fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.log.lock().unwrap().ops.push(DisplayOp::Clear);
        Ok(())
    }

    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        check_cursor(row, col)?;
        self.log.lock().unwrap().ops.push(DisplayOp::SetCursor(row, col));
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut log = self.log.lock().unwrap();
        if core::mem::take(&mut log.fail_next_print) {
            return Err(DisplayError::Interface);
        }
        log.ops.push(DisplayOp::Print(text.into()));
        Ok(())
    }
}

#[derive(Default)]
struct LedState {
    high: bool,
    toggles: usize,
    failing: bool,
}

/// An output pin that counts toggles. Can be switched into a failing mode.
#[derive(Clone, Default)]
pub struct CountingLed {
    state: Arc<Mutex<LedState>>,
}

impl CountingLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggles(&self) -> usize {
        self.state.lock().unwrap().toggles
    }

    pub fn is_high(&self) -> bool {
        self.state.lock().unwrap().high
    }

    pub fn fail_toggles(&self) {
        self.state.lock().unwrap().failing = true;
    }
}

#[derive(Debug)]
pub struct LedFault;

impl embedded_hal::digital::Error for LedFault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for CountingLed {
    type Error = LedFault;
}

impl OutputPin for CountingLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.lock().unwrap().high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.lock().unwrap().high = true;
        Ok(())
    }
}

impl StatefulOutputPin for CountingLed {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state.lock().unwrap().high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.lock().unwrap().high)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.lock().unwrap();
        if state.failing {
            return Err(LedFault);
        }
        state.high = !state.high;
        state.toggles += 1;
        Ok(())
    }
}
