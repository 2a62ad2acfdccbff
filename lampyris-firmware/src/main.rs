//! Lampyris - Wearable LED Badge Firmware
//!
//! Main firmware binary for RP2040-based badge boards.
//!
//! Named after Lampyris, the firefly genus - a small battery-powered
//! creature whose whole job is keeping time and glowing on schedule.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_rp::watchdog::Watchdog;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use {defmt_rtt as _, panic_probe as _};

use crate::channels::CONFIG;
use crate::touch::GpioTouch;
use crate::watchdog::RpWatchdog;

mod channels;
mod tasks;
mod touch;
mod watchdog;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lampyris firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // SPI0 to the LED controller. Mode 0, MSB first, well under the
    // controller's maximum clock. The controller never talks back, so
    // the bus is TX-only.
    let spi_config = {
        let mut cfg = spi::Config::default();
        cfg.frequency = 2_000_000;
        cfg
    };
    let spi_bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_2, p.PIN_3, spi_config);
    let cs = Output::new(p.PIN_5, Level::High);
    let spi = ExclusiveDevice::new(spi_bus, cs, Delay).unwrap();
    info!("SPI initialized for LED controller");

    // Hardware watchdog; the dispatcher arms and feeds it.
    let wdt = RpWatchdog::new(Watchdog::new(p.WATCHDOG), CONFIG.watchdog_period_ms);

    // Touch pad: active-low line from the touch driver IC.
    let touch = GpioTouch::new(Input::new(p.PIN_15, Pull::Up));

    // On-die temperature sensor for the thermal monitor.
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let sensor = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    info!("ADC initialized");

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::thermal_task(adc, sensor)).unwrap();
    spawner.spawn(tasks::badge_task(spi, wdt, touch)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
