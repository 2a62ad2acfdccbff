//! Badge main-loop task
//!
//! Owns the dispatcher and the display. Sleeps until a wake is
//! signalled, runs one dispatcher pass, and goes back to sleep. All
//! visible badge behavior lives in the [`Bling`] hooks: the idle
//! pulse animation, the button reactions, and the thermal dimming.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;

use lampyris_core::dispatcher::Dispatcher;
use lampyris_core::traits::EventHooks;
use lampyris_drivers::{AddressMap, Ht16d35a, Rgb16, Rgb8};

use crate::channels::{BUTTON, CLOCK, CONFIG, FLAGS, WAKE};
use crate::touch::GpioTouch;
use crate::watchdog::RpWatchdog;

/// The LED controller sits alone on SPI0 behind a GPIO chip select.
pub type BadgeSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

type BadgeDisplay = Ht16d35a<BadgeSpi>;

/// Idle pulse period in ticks (2 seconds at 100 Hz).
const PULSE_PERIOD_TICKS: u16 = 200;

/// Global brightness while the badge is running hot.
const THERMAL_DIM_BRIGHTNESS: u8 = 0x08;

/// Colors cycled by short presses. 16-bit entries per the animation
/// table convention; narrowed at the framebuffer boundary.
const PALETTE: [Rgb16; 6] = [
    Rgb16::new(0xFFFF, 0x2000, 0x0000), // ember
    Rgb16::new(0xFFFF, 0x8000, 0x0000), // amber
    Rgb16::new(0x1000, 0xFFFF, 0x1000), // firefly green
    Rgb16::new(0x0000, 0x4000, 0xFFFF), // ice blue
    Rgb16::new(0xA000, 0x0000, 0xFFFF), // violet
    Rgb16::new(0xFFFF, 0xFFFF, 0xFFFF), // white
];

/// Scale a palette color to a pulse level in `[0, 100]`.
fn scaled(color: Rgb16, level: u16) -> Rgb8 {
    Rgb8::new(
        ((color.r >> 8) as u16 * level / 100) as u8,
        ((color.g >> 8) as u16 * level / 100) as u8,
        ((color.b >> 8) as u16 * level / 100) as u8,
    )
}

/// Event hooks driving the display.
struct Bling {
    display: BadgeDisplay,
    palette_index: usize,
    phase: u16,
    display_enabled: bool,
}

impl Bling {
    fn new(display: BadgeDisplay) -> Self {
        Self {
            display,
            palette_index: 0,
            phase: 0,
            display_enabled: true,
        }
    }
}

// Display calls are unwrapped throughout: a bus fault is
// unrecoverable, so panic and let the watchdog restart the badge.
impl EventHooks for Bling {
    fn on_animation_tick(&mut self) {
        if !self.display_enabled {
            return;
        }

        self.phase = (self.phase + 1) % PULSE_PERIOD_TICKS;
        let level = if self.phase < PULSE_PERIOD_TICKS / 2 {
            self.phase
        } else {
            PULSE_PERIOD_TICKS - self.phase
        };

        let color = scaled(PALETTE[self.palette_index], level);
        self.display.all_one_color(color).unwrap();
    }

    fn on_second(&mut self, elapsed: u32) {
        if elapsed % 60 == 0 {
            debug!("Uptime: {} min", elapsed / 60);
        }
    }

    fn on_long_press(&mut self) {
        self.display_enabled = !self.display_enabled;
        if self.display_enabled {
            info!("Display on");
            self.display.display_on().unwrap();
        } else {
            info!("Display off");
            self.display.display_off().unwrap();
        }
    }

    fn on_short_release(&mut self) {
        self.palette_index = (self.palette_index + 1) % PALETTE.len();
        debug!("Palette index: {}", self.palette_index);
    }

    fn on_thermal_hot(&mut self) {
        warn!("Running hot, dimming display");
        self.display
            .set_global_brightness(THERMAL_DIM_BRIGHTNESS)
            .unwrap();
    }

    fn on_thermal_cold(&mut self) {
        info!("Running cold, restoring brightness");
        self.display
            .set_global_brightness(CONFIG.default_brightness)
            .unwrap();
    }
}

/// Badge task - initializes the display, then services wakes forever.
#[embassy_executor::task]
pub async fn badge_task(spi: BadgeSpi, watchdog: RpWatchdog, touch: GpioTouch) {
    info!("Badge task started");

    let map = AddressMap::linear(CONFIG.led_count as usize);
    let mut display = Ht16d35a::new(spi, map);
    display.init().unwrap();
    display
        .set_global_brightness(CONFIG.default_brightness)
        .unwrap();
    info!("Display initialized ({} LEDs)", display.led_count());

    // Creating the dispatcher arms the watchdog; from here on the
    // badge must keep waking and passing.
    let mut dispatcher = Dispatcher::new(
        &FLAGS,
        &CLOCK,
        &BUTTON,
        watchdog,
        Bling::new(display),
        touch,
    );

    loop {
        WAKE.wait().await;
        dispatcher.run_pass();
    }
}
