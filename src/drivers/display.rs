use crate::{DISPLAY_COLUMNS, DISPLAY_ROWS, error::DisplayError};

/// A character display addressed by text row and column
#[allow(async_fn_in_trait)]
pub trait TextDisplay {
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank the whole display and home the cursor
    async fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor to a character cell. `(0, 0)` is the top left.
    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError>;

    /// Write text starting at the cursor
    async fn print(&mut self, text: &str) -> Result<(), DisplayError>;
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    async fn init(&mut self) -> Result<(), DisplayError> {
        T::init(self).await
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        T::clear(self).await
    }

    async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), DisplayError> {
        T::set_cursor(self, row, col).await
    }

    async fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        T::print(self, text).await
    }
}

/// Check a cursor position against the display geometry
pub fn check_cursor(row: u8, col: u8) -> Result<(), DisplayError> {
    if usize::from(row) < DISPLAY_ROWS && usize::from(col) < DISPLAY_COLUMNS {
        Ok(())
    } else {
        Err(DisplayError::CursorOutOfRange { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_bounds() {
        assert_eq!(check_cursor(0, 0), Ok(()));
        assert_eq!(check_cursor(1, 15), Ok(()));
        assert_eq!(
            check_cursor(2, 0),
            Err(DisplayError::CursorOutOfRange { row: 2, col: 0 })
        );
        assert_eq!(
            check_cursor(0, 16),
            Err(DisplayError::CursorOutOfRange { row: 0, col: 16 })
        );
    }
}
