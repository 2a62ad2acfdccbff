//! 100 Hz time base task
//!
//! Stands in for the hardware timer interrupt: advances the tick
//! clock, requests touch housekeeping, and wakes the dispatcher.
//! Everything called from here is O(1); the per-tick work lives in the
//! dispatcher, in task context.

use defmt::*;
use embassy_time::{Duration, Ticker};

use lampyris_core::clock::TICKS_PER_SECOND;

use crate::channels::{BUTTON, CLOCK, FLAGS, WAKE};

/// Tick task - advances the time base at 100 Hz.
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut ticker = Ticker::every(Duration::from_hz(TICKS_PER_SECOND as u64));

    loop {
        ticker.next().await;

        CLOCK.on_tick(&FLAGS, &BUTTON);
        FLAGS.raise_touch_service();

        // Wake unconditionally; the dispatcher drains whatever is set.
        WAKE.signal(());
    }
}
