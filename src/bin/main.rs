#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use ambient_light_controller::{
    ActuationTask, Config, InitError, PresentationTask, QUEUE_CAPACITY, ReadingChannel,
    SamplingTask, Task,
    drivers::{LightSensor, OledTextDisplay, TextDisplay, Tsl2561},
};
use defmt::{error, info};
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Delay, Timer};
use embedded_hal::i2c::{ErrorType, Operation};
use esp_hal::{
    Async,
    Config as HalConfig,
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, Error as I2cError, I2c},
    interrupt::{Priority, software::SoftwareInterruptControl},
    time::Rate,
    timer::systimer::SystemTimer,
};
use esp_hal_embassy::InterruptExecutor;
use panic_rtt_target as _;
use static_cell::StaticCell;

type I2cBus = Mutex<CriticalSectionRawMutex, SingleCoreI2c>;
type SharedI2c = I2cDevice<'static, CriticalSectionRawMutex, SingleCoreI2c>;
type Readings = ReadingChannel<CriticalSectionRawMutex, QUEUE_CAPACITY>;

type Sampling = SamplingTask<
    'static,
    Tsl2561<SharedI2c, Delay>,
    Delay,
    CriticalSectionRawMutex,
    QUEUE_CAPACITY,
>;
type Presentation =
    PresentationTask<'static, OledTextDisplay<SharedI2c>, CriticalSectionRawMutex, QUEUE_CAPACITY>;
type Actuation =
    ActuationTask<'static, Output<'static>, Delay, CriticalSectionRawMutex, QUEUE_CAPACITY>;

/// The async I2C0 driver, shared by tasks on two interrupt executors.
///
/// esp-hal marks async drivers `!Send` because their interrupt handler is bound to the core that
/// called `into_async`. The ESP32-C3 has a single core, so that handler serves every executor.
struct SingleCoreI2c(I2c<'static, Async>);

// SAFETY: single core, and all access goes through the bus mutex
unsafe impl Send for SingleCoreI2c {}

impl ErrorType for SingleCoreI2c {
    type Error = I2cError;
}

impl embedded_hal_async::i2c::I2c for SingleCoreI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        SingleCoreFuture(embedded_hal_async::i2c::I2c::transaction(
            &mut self.0,
            address,
            operations,
        ))
        .await
    }
}

/// Carries a driver future that is only `!Send` because of its driver mode marker
struct SingleCoreFuture<F>(F);

// SAFETY: see `SingleCoreI2c`
unsafe impl<F> Send for SingleCoreFuture<F> {}

impl<F: Future> Future for SingleCoreFuture<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // SAFETY: the inner future is never moved out of the pinned wrapper
        unsafe { self.map_unchecked_mut(|f| &mut f.0) }.poll(cx)
    }
}

/// I2c bus shared between the display and the light sensor
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

/// Readings from the sampling task to the presentation and actuation tasks
static READINGS: StaticCell<Readings> = StaticCell::new();

static SAMPLING_EXECUTOR: StaticCell<InterruptExecutor<1>> = StaticCell::new();
static PRESENTATION_EXECUTOR: StaticCell<InterruptExecutor<2>> = StaticCell::new();

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn sampling_task(mut task: Sampling) {
    task.run().await
}

#[embassy_executor::task]
async fn presentation_task(mut task: Presentation) {
    task.run().await
}

#[embassy_executor::task]
async fn actuation_task(mut task: Actuation) {
    task.run().await
}

/// Validate the configuration, then initialise the display and the sensor, in that order
async fn bring_up(
    config: &Config,
    display: &mut impl TextDisplay,
    sensor: &mut impl LightSensor,
) -> Result<(), InitError> {
    config.validate()?;
    display.init().await?;
    sensor.init().await?;
    Ok(())
}

/// Report a start-up failure and park. The LED is never driven so the board looks dead.
async fn halt(err: InitError) -> ! {
    error!("MAIN: initialisation failed: {}", err);
    loop {
        Timer::after_secs(10).await;
    }
}

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    #[cfg(all(feature = "rtt", feature = "defmt"))]
    rtt_target::rtt_init_defmt!();

    let peripherals = esp_hal::init(HalConfig::default().with_cpu_clock(CpuClock::max()));
    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let i2c = I2C_BUS.init(Mutex::new(SingleCoreI2c(
        I2c::new(
            peripherals.I2C0,
            I2cConfig::default().with_frequency(Rate::from_khz(100)),
        )
        .expect("Failed to initialise I2C0")
        .with_scl(peripherals.GPIO6)
        .with_sda(peripherals.GPIO5)
        .into_async(),
    )));

    let config = Config::default();
    let mut display = OledTextDisplay::new(I2cDevice::new(i2c));
    let mut sensor = Tsl2561::new(I2cDevice::new(i2c), Delay);
    if let Err(e) = bring_up(&config, &mut display, &mut sensor).await {
        halt(e).await;
    }
    info!("MAIN: display and sensor ready");

    let readings: &'static Readings = READINGS.init(ReadingChannel::new());

    let mut presentation = PresentationTask::new(display, readings);
    if let Err(e) = presentation.show_waiting().await {
        error!("MAIN: waiting screen failed: {}", e);
    }
    let sampling = SamplingTask::new(sensor, Delay, readings, config.sample_period_ms);
    let led = Output::new(peripherals.GPIO3, Level::Low, OutputConfig::default());
    let actuation = ActuationTask::new(led, Delay, readings, config.blink);

    // Sampling preempts presentation, both preempt the thread-mode actuation task. Their futures
    // are `Send` only because the bus is `SingleCoreI2c`.
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let sampling_spawner = SAMPLING_EXECUTOR
        .init(InterruptExecutor::new(sw_ints.software_interrupt1))
        .start(Priority::Priority3);
    let presentation_spawner = PRESENTATION_EXECUTOR
        .init(InterruptExecutor::new(sw_ints.software_interrupt2))
        .start(Priority::Priority2);

    sampling_spawner
        .spawn(sampling_task(sampling))
        .expect("Failed to spawn sampling task");
    presentation_spawner
        .spawn(presentation_task(presentation))
        .expect("Failed to spawn presentation task");
    spawner
        .spawn(actuation_task(actuation))
        .expect("Failed to spawn actuation task");

    info!("MAIN: sampling every {} ms, tasks running", config.sample_period_ms);
}
