//! Thermal excursion monitor
//!
//! Samples the RP2040 on-die temperature sensor once per second and
//! raises a one-shot event when the temperature leaves the configured
//! comfort band. The event latches until the temperature moves to a
//! different band, so a badge left in the sun raises `thermal_hot`
//! once, not once per sample.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use crate::channels::{CONFIG, FLAGS, WAKE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    InRange,
    Hot,
    Cold,
}

/// Convert a raw 12-bit ADC reading of the on-die sensor to degrees
/// Fahrenheit. Datasheet formula: T = 27 - (V - 0.706) / 0.001721,
/// done in integer millivolts.
fn raw_to_fahrenheit(raw: u16) -> i16 {
    let millivolts = raw as i32 * 3300 / 4096;
    let centi_celsius = 2700 - (millivolts - 706) * 100_000 / 1721;
    let centi_fahrenheit = centi_celsius * 9 / 5 + 3200;
    (centi_fahrenheit / 100) as i16
}

/// Thermal task - watches the die temperature for excursions.
#[embassy_executor::task]
pub async fn thermal_task(mut adc: Adc<'static, Async>, mut sensor: Channel<'static>) {
    info!("Thermal task started");

    let mut ticker = Ticker::every(Duration::from_secs(1));
    let mut band = Band::InRange;

    loop {
        ticker.next().await;

        let raw = match adc.read(&mut sensor).await {
            Ok(raw) => raw,
            Err(_) => {
                warn!("ADC read error");
                continue;
            }
        };

        let temp_f = raw_to_fahrenheit(raw);
        trace!("Die temperature: {}F", temp_f);

        let next = if temp_f > CONFIG.thermal_hot_f {
            Band::Hot
        } else if temp_f < CONFIG.thermal_cold_f {
            Band::Cold
        } else {
            Band::InRange
        };

        if next == band {
            continue;
        }
        band = next;

        match band {
            Band::Hot => {
                warn!("Thermal excursion: hot ({}F)", temp_f);
                FLAGS.raise_thermal_hot();
                WAKE.signal(());
            }
            Band::Cold => {
                warn!("Thermal excursion: cold ({}F)", temp_f);
                FLAGS.raise_thermal_cold();
                WAKE.signal(());
            }
            Band::InRange => {
                info!("Temperature back in range ({}F)", temp_f);
            }
        }
    }
}
