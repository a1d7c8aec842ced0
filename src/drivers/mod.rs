pub mod display;
#[cfg(feature = "oled")]
pub mod oled;
pub mod sensor;
pub mod tsl2561;

pub use display::TextDisplay;
#[cfg(feature = "oled")]
pub use oled::OledTextDisplay;
pub use sensor::LightSensor;
pub use tsl2561::Tsl2561;
