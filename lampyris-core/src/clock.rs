//! Tick-driven time base
//!
//! The hardware timer interrupt fires 100 times per second and calls
//! [`TickClock::on_tick`]. The clock keeps a 1-based sub-second tick
//! counter and a monotonic elapsed-seconds counter. Precision is
//! medium at best, which is fine: the badge only has to keep time for
//! a multi-day event, not forever.
//!
//! The sub-second counter wraps from 100 back to 1 rather than 0. The
//! 1-based phase means every value in `[1, 100]` is observable exactly
//! once per second, so a captured hold target tick (see
//! [`crate::button::ButtonInput`]) always has exactly one match.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

use crate::button::ButtonInput;
use crate::events::EventFlags;

/// Tick interrupts per second.
pub const TICKS_PER_SECOND: u8 = 100;

/// The badge time base.
///
/// Field discipline: `subsecond` is written only from the tick
/// interrupt and read from dispatcher context; `seconds` is written
/// only from dispatcher context (via [`Self::advance_second`]) and read
/// by anyone, including the external persistence collaborator.
pub struct TickClock {
    /// Sub-second tick counter, `[1, TICKS_PER_SECOND]`, wraps to 1.
    subsecond: AtomicU8,
    /// Seconds since the application epoch. Monotonic, never wraps
    /// within the badge's operating lifetime.
    seconds: AtomicU32,
}

impl TickClock {
    /// Create a clock at the epoch.
    pub const fn new() -> Self {
        Self::with_epoch(0)
    }

    /// Create a clock resuming from a persisted seconds count.
    pub const fn with_epoch(seconds: u32) -> Self {
        Self {
            subsecond: AtomicU8::new(1),
            seconds: AtomicU32::new(seconds),
        }
    }

    /// Service one 100 Hz tick interrupt.
    ///
    /// O(1), interrupt context. Advances the sub-second counter, raises
    /// `second` on wrap, always raises `tick`, and runs the button hold
    /// comparison. The caller requests a main-loop wake unconditionally
    /// after this returns.
    pub fn on_tick(&self, flags: &EventFlags, button: &ButtonInput) {
        let next = self.subsecond.load(Ordering::Relaxed) % TICKS_PER_SECOND + 1;
        self.subsecond.store(next, Ordering::Relaxed);

        if next == 1 {
            flags.raise_second();
        }
        flags.raise_tick();

        button.tick(next, flags);
    }

    /// Current sub-second tick value, `[1, TICKS_PER_SECOND]`.
    pub fn subsecond(&self) -> u8 {
        self.subsecond.load(Ordering::Relaxed)
    }

    /// Seconds elapsed since the application epoch.
    pub fn elapsed_seconds(&self) -> u32 {
        self.seconds.load(Ordering::Relaxed)
    }

    /// Credit one elapsed second. Dispatcher context only, called once
    /// per serviced `second` flag. Returns the new count.
    pub fn advance_second(&self) -> u32 {
        self.seconds.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Run `t` ticks, servicing `second` the way the dispatcher does.
    fn run_ticks(clock: &TickClock, flags: &EventFlags, button: &ButtonInput, t: u32) {
        for _ in 0..t {
            clock.on_tick(flags, button);
            if flags.take_second() {
                clock.advance_second();
            }
        }
    }

    #[test]
    fn test_initial_phase() {
        let clock = TickClock::new();
        assert_eq!(clock.subsecond(), 1);
        assert_eq!(clock.elapsed_seconds(), 0);
    }

    #[test]
    fn test_second_fires_every_hundred_ticks() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(50);

        for t in 1..=300u32 {
            clock.on_tick(&flags, &button);
            let fired = flags.take_second();
            assert_eq!(fired, t % 100 == 0, "at tick {t}");
            if fired {
                clock.advance_second();
            }
        }
        assert_eq!(clock.elapsed_seconds(), 3);
    }

    #[test]
    fn test_wraps_to_one_not_zero() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(50);

        run_ticks(&clock, &flags, &button, 99);
        assert_eq!(clock.subsecond(), TICKS_PER_SECOND);
        run_ticks(&clock, &flags, &button, 1);
        assert_eq!(clock.subsecond(), 1);
    }

    #[test]
    fn test_epoch_restore() {
        let clock = TickClock::with_epoch(212_400);
        assert_eq!(clock.elapsed_seconds(), 212_400);
        assert_eq!(clock.advance_second(), 212_401);
    }

    proptest! {
        #[test]
        fn test_counter_arithmetic(t in 1u32..20_000) {
            let clock = TickClock::new();
            let flags = EventFlags::new();
            let button = ButtonInput::new(50);

            run_ticks(&clock, &flags, &button, t);

            prop_assert_eq!(clock.elapsed_seconds(), t / 100);
            prop_assert_eq!(u32::from(clock.subsecond()), 1 + t % 100);
        }
    }
}
