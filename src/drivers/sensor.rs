use crate::error::SensorError;

/// An ambient light sensor that reports illuminance in whole lux.
///
/// Reads are expected to finish in bounded time and may fail transiently.
#[allow(async_fn_in_trait)]
pub trait LightSensor {
    /// Bring the sensor out of reset and configure it. Called once before the first read.
    async fn init(&mut self) -> Result<(), SensorError>;

    /// Take one illuminance measurement
    async fn read_lux(&mut self) -> Result<u32, SensorError>;
}

impl<T: LightSensor + ?Sized> LightSensor for &mut T {
    async fn init(&mut self) -> Result<(), SensorError> {
        T::init(self).await
    }

    async fn read_lux(&mut self) -> Result<u32, SensorError> {
        T::read_lux(self).await
    }
}
