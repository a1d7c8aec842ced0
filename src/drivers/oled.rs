use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::Point,
    text::{Baseline, Text},
};
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    I2CDisplayInterface, Ssd1306Async,
    mode::{BufferedGraphicsModeAsync, DisplayConfigAsync},
    prelude::{DisplayRotation, I2CInterface},
    size::DisplaySize128x64,
};

use super::display::{TextDisplay, check_cursor};
use crate::error::DisplayError;

/// Character cell size for `FONT_6X10`, with two pixels of leading between rows
const CELL_WIDTH: i32 = 6;
const CELL_HEIGHT: i32 = 12;

type Oled<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// A 128x64 SSD1306 used as a character display.
///
/// Text is drawn into the frame buffer and pushed to the panel on every [`TextDisplay::print`],
/// so a clear followed by a print is a single visible update.
pub struct OledTextDisplay<I2C> {
    display: Oled<I2C>,
    style: MonoTextStyle<'static, BinaryColor>,
    cursor: Point,
}

impl<I2C: I2c> OledTextDisplay<I2C> {
    /// # Parameters
    /// * `i2c` - The bus (or shared bus device) the panel is attached to
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .build();
        Self {
            display,
            style,
            cursor: Point::zero(),
        }
    }
}

impl<I2C: I2c> TextDisplay for OledTextDisplay<I2C> {
    async fn init(&mut self) -> Result<(), DisplayError> {
        self.display
            .init()
            .await
            .map_err(|_| DisplayError::Interface)?;
        self.display.clear_buffer();
        self.display
            .flush()
            .await
            .map_err(|_| DisplayError::Interface)
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        self.display.clear_buffer();
        self.cursor = Point::zero();
        Ok(())
    }

    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        check_cursor(row, col)?;
        self.cursor = Point::new(i32::from(col) * CELL_WIDTH, i32::from(row) * CELL_HEIGHT);
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        Text::with_baseline(text, self.cursor, self.style, Baseline::Top)
            .draw(&mut self.display)
            .map_err(|_| DisplayError::Interface)?;
        self.display
            .flush()
            .await
            .map_err(|_| DisplayError::Interface)
    }
}
