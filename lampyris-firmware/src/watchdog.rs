//! RP2040 hardware watchdog behind the core trait

use embassy_rp::watchdog::Watchdog as HwWatchdog;
use embassy_time::Duration;

use lampyris_core::traits::Watchdog;

/// Hardware watchdog with the period fixed at construction. Once
/// started there is no way to stop it; only a reset.
pub struct RpWatchdog {
    inner: HwWatchdog,
    period: Duration,
}

impl RpWatchdog {
    pub fn new(inner: HwWatchdog, period_ms: u32) -> Self {
        Self {
            inner,
            period: Duration::from_millis(period_ms as u64),
        }
    }
}

impl Watchdog for RpWatchdog {
    fn start(&mut self) {
        self.inner.start(self.period);
    }

    fn pet(&mut self) {
        self.inner.feed();
    }
}
