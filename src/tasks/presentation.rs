use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use super::Task;
use crate::{
    DISPLAY_COLUMNS, Reading, channel::ReadingChannel, drivers::TextDisplay,
    error::DisplayError,
};

/// Room for the widest line, `"Light: 4294967295 lux"`, before it is cut to the display width
pub const LINE_CAPACITY: usize = 32;

pub type Line = String<LINE_CAPACITY>;

/// Render a reading as the line shown on the display, cut to [`DISPLAY_COLUMNS`] characters
pub fn format_reading(reading: Reading) -> Line {
    let mut line = Line::new();
    // The capacity covers every u32, so the write cannot run out of room
    let _ = ufmt::uwrite!(line, "Light: {} lux", reading.lux);
    line.truncate(DISPLAY_COLUMNS);
    line
}

/// Waits for readings and shows each one, redrawing the whole display every time.
///
/// This task competes with the actuation task for readings, so it only sees the ones it wins.
/// Render failures are logged and the loop carries on with the next reading.
pub struct PresentationTask<'a, T, M: RawMutex, const N: usize> {
    display: T,
    channel: &'a ReadingChannel<M, N>,
}

impl<'a, T, M, const N: usize> PresentationTask<'a, T, M, N>
where
    T: TextDisplay,
    M: RawMutex,
{
    /// # Parameters
    /// * `display` - An initialised display
    /// * `channel` - Where readings are received from
    pub fn new(display: T, channel: &'a ReadingChannel<M, N>) -> Self {
        Self { display, channel }
    }

    /// Placeholder shown between start-up and the first reading
    pub async fn show_waiting(&mut self) -> Result<(), DisplayError> {
        self.display.clear().await?;
        self.display.set_cursor(0, 0).await?;
        self.display.print("Waiting for").await?;
        self.display.set_cursor(1, 0).await?;
        self.display.print("sensor data").await
    }

    /// Clear the display and write `line` from the top left
    pub async fn render(&mut self, line: &str) -> Result<(), DisplayError> {
        self.display.clear().await?;
        self.display.set_cursor(0, 0).await?;
        self.display.print(line).await
    }

    /// Block for the next reading, then render it. Returns the reading that was shown.
    pub async fn present(&mut self) -> Result<Reading, DisplayError> {
        let reading = self.channel.receive().await;
        let line = format_reading(reading);
        self.render(&line).await?;
        Ok(reading)
    }
}

impl<T, M, const N: usize> Task for PresentationTask<'_, T, M, N>
where
    T: TextDisplay,
    M: RawMutex,
{
    async fn step(&mut self) {
        match self.present().await {
            Ok(reading) => trace!("DISPLAY: showing {} lux", reading.lux),
            Err(e) => error!("DISPLAY: render failed: {:?}", e),
        }
    }
}
