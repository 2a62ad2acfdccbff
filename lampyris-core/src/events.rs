//! One-shot event flags between interrupt context and the dispatcher
//!
//! Each flag is an independent single-bit event marker: set by exactly
//! one producer (usually an interrupt handler) and cleared by exactly
//! one consumer (the dispatcher). Flags are never combined or batched.
//! A flag raised while the dispatcher is mid-pass is serviced on the
//! next pass, never the current one.
//!
//! Any data consumed alongside a flag (for example the captured hold
//! target tick in [`crate::button::ButtonInput`]) must be fully written
//! before the flag is raised; the release store here pairs with the
//! acquire swap in [`Flag::take`] so the dispatcher never sees a torn
//! companion value.

use portable_atomic::{AtomicBool, Ordering};

/// A single event flag with one producer and one designated consumer.
struct Flag(AtomicBool);

impl Flag {
    const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Producer side: mark the event pending.
    fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consumer side: check-and-clear in one atomic step.
    ///
    /// Returns true at most once per raise.
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// The full set of cross-context event flags for the badge runtime.
///
/// Grouping the flags behind one structure keeps the shared interrupt
/// state at a single access point instead of scattered globals. The
/// producer/consumer assignment per flag:
///
/// | flag            | raised by                         | taken by       |
/// |-----------------|-----------------------------------|----------------|
/// | `tick`          | tick interrupt (100 Hz)           | dispatcher     |
/// | `second`        | tick interrupt, on wrap           | dispatcher     |
/// | `long_press`    | tick interrupt, on hold expiry    | dispatcher     |
/// | `short_release` | touch release edge                | dispatcher     |
/// | `thermal_hot`   | temperature monitor               | dispatcher     |
/// | `thermal_cold`  | temperature monitor               | dispatcher     |
/// | `touch_service` | touch library timer               | dispatcher     |
pub struct EventFlags {
    tick: Flag,
    second: Flag,
    long_press: Flag,
    short_release: Flag,
    thermal_hot: Flag,
    thermal_cold: Flag,
    touch_service: Flag,
}

impl EventFlags {
    /// Create a new set of flags, all clear.
    ///
    /// `const` so the firmware can place the flags in a `static`.
    pub const fn new() -> Self {
        Self {
            tick: Flag::new(),
            second: Flag::new(),
            long_press: Flag::new(),
            short_release: Flag::new(),
            thermal_hot: Flag::new(),
            thermal_cold: Flag::new(),
            touch_service: Flag::new(),
        }
    }

    /// Raise the 100 Hz animation/debounce tick.
    pub fn raise_tick(&self) {
        self.tick.raise();
    }

    /// Take the tick flag (dispatcher only).
    pub fn take_tick(&self) -> bool {
        self.tick.take()
    }

    /// Raise the once-per-second flag.
    pub fn raise_second(&self) {
        self.second.raise();
    }

    /// Take the second flag (dispatcher only).
    pub fn take_second(&self) -> bool {
        self.second.take()
    }

    /// Raise the long-press flag. Fired at most once per press.
    pub fn raise_long_press(&self) {
        self.long_press.raise();
    }

    /// Take the long-press flag (dispatcher only).
    pub fn take_long_press(&self) -> bool {
        self.long_press.take()
    }

    /// Raise the short-release flag (released before the hold expired).
    pub fn raise_short_release(&self) {
        self.short_release.raise();
    }

    /// Take the short-release flag (dispatcher only).
    pub fn take_short_release(&self) -> bool {
        self.short_release.take()
    }

    /// Raise the over-temperature flag.
    pub fn raise_thermal_hot(&self) {
        self.thermal_hot.raise();
    }

    /// Take the over-temperature flag (dispatcher only).
    pub fn take_thermal_hot(&self) -> bool {
        self.thermal_hot.take()
    }

    /// Raise the under-temperature flag.
    pub fn raise_thermal_cold(&self) {
        self.thermal_cold.raise();
    }

    /// Take the under-temperature flag (dispatcher only).
    pub fn take_thermal_cold(&self) -> bool {
        self.thermal_cold.take()
    }

    /// Raise the touch-library housekeeping flag.
    pub fn raise_touch_service(&self) {
        self.touch_service.raise();
    }

    /// Take the touch-library housekeeping flag (dispatcher only).
    pub fn take_touch_service(&self) -> bool {
        self.touch_service.take()
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}
