//! Touch pad input
//!
//! The badge PCB routes the touch pad through a touch driver IC whose
//! output is a plain active-low digital line, so the firmware side is
//! a debounced GPIO read. The debounce requires a few consecutive
//! identical samples before a level change is reported; sampling
//! happens at the touch-housekeeping cadence, once per tick.

use embassy_rp::gpio::Input;

use lampyris_core::traits::{TouchReport, TouchSource};

/// Consecutive identical samples required to accept a level change.
const DEBOUNCE_SAMPLES: u8 = 3;

/// Debounced active-low touch input.
pub struct GpioTouch {
    pin: Input<'static>,
    stable: bool,
    candidate: bool,
    run: u8,
}

impl GpioTouch {
    pub fn new(pin: Input<'static>) -> Self {
        Self {
            pin,
            stable: false,
            candidate: false,
            run: 0,
        }
    }
}

impl TouchSource for GpioTouch {
    fn update(&mut self) -> Option<TouchReport> {
        let raw = self.pin.is_low();

        if raw == self.candidate {
            self.run = self.run.saturating_add(1);
        } else {
            self.candidate = raw;
            self.run = 1;
        }

        if self.run < DEBOUNCE_SAMPLES || raw == self.stable {
            return None;
        }

        let previously_touched = self.stable;
        self.stable = raw;
        Some(TouchReport {
            touched: raw,
            previously_touched,
        })
    }
}
