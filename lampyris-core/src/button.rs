//! Button edge derivation and long-press detection
//!
//! The capacitive touch library reports `(currently touched, previously
//! touched)` pairs; an edge is the XOR of the two. A press edge arms a
//! hold comparison against an absolute sub-second tick value, computed
//! once in dispatcher context so the tick interrupt stays O(1). The
//! interrupt then raises `long_press` on the single tick where the
//! counter hits the target.
//!
//! The target is computed modulo [`TICKS_PER_SECOND`], so a press that
//! starts near the second boundary still triggers after exactly
//! `hold_ticks` ticks. This bounds the hold duration to under one
//! second; the clamp in [`ButtonInput::new`] enforces that.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use crate::clock::{TickClock, TICKS_PER_SECOND};
use crate::events::EventFlags;
use crate::traits::TouchReport;

/// Lifecycle of the badge button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Not touched.
    Released,
    /// Touched, hold threshold not yet reached.
    Held,
    /// Touched past the hold threshold; `long_press` has fired.
    LongHeld,
}

const STATE_RELEASED: u8 = 0;
const STATE_HELD: u8 = 1;
const STATE_LONG_HELD: u8 = 2;

/// Shared button state between dispatcher and tick interrupt.
///
/// Field discipline: `state` is written only from dispatcher context.
/// `hold_armed` is set on the press edge (dispatcher) and cleared by
/// whichever side ends the hold first: the tick interrupt when the
/// target is reached, or the release edge. `hold_target` is written
/// before `hold_armed` is set and read only while it is set.
pub struct ButtonInput {
    state: AtomicU8,
    hold_armed: AtomicBool,
    hold_target: AtomicU8,
    hold_ticks: u8,
}

impl ButtonInput {
    /// Create a button with the given long-press hold duration in
    /// ticks. Clamped to `[1, TICKS_PER_SECOND - 1]` so the hold
    /// target is unambiguous within one wrap of the tick counter.
    pub const fn new(hold_ticks: u8) -> Self {
        let hold_ticks = if hold_ticks == 0 {
            1
        } else if hold_ticks >= TICKS_PER_SECOND {
            TICKS_PER_SECOND - 1
        } else {
            hold_ticks
        };
        Self {
            state: AtomicU8::new(STATE_RELEASED),
            hold_armed: AtomicBool::new(false),
            hold_target: AtomicU8::new(0),
            hold_ticks,
        }
    }

    /// Feed one touch report from the sensing library. Dispatcher
    /// context. Reports with no state change are ignored.
    pub fn on_touch_report(&self, report: TouchReport, clock: &TickClock, flags: &EventFlags) {
        // Edge = XOR of current and previous touched state.
        if report.touched == report.previously_touched {
            return;
        }
        if report.touched {
            self.record_press_start(clock);
        } else {
            self.record_release(flags);
        }
    }

    /// A press edge: capture the current sub-second tick and arm the
    /// hold comparison at `(sub - 1 + hold_ticks) mod 100 + 1`.
    pub fn record_press_start(&self, clock: &TickClock) {
        let sub = clock.subsecond();
        let target = (sub - 1 + self.hold_ticks) % TICKS_PER_SECOND + 1;

        // Target must be visible before the interrupt can observe the
        // armed bit.
        self.hold_target.store(target, Ordering::Relaxed);
        self.state.store(STATE_HELD, Ordering::Relaxed);
        self.hold_armed.store(true, Ordering::Release);
    }

    /// A release edge. Raises `short_release` only when the hold was
    /// still armed, i.e. the long press never fired.
    pub fn record_release(&self, flags: &EventFlags) {
        let was_armed = self.hold_armed.swap(false, Ordering::AcqRel);
        if was_armed && self.state.load(Ordering::Relaxed) == STATE_HELD {
            flags.raise_short_release();
        }
        self.state.store(STATE_RELEASED, Ordering::Relaxed);
    }

    /// Hold comparison, run once per tick from interrupt context.
    ///
    /// Disarms before raising so `long_press` fires exactly once per
    /// press, even if the button stays down across further wraps.
    pub(crate) fn tick(&self, subsecond: u8, flags: &EventFlags) {
        if self.hold_armed.load(Ordering::Acquire)
            && subsecond == self.hold_target.load(Ordering::Relaxed)
        {
            self.hold_armed.store(false, Ordering::Relaxed);
            flags.raise_long_press();
        }
    }

    /// Dispatcher transition when servicing `long_press`.
    pub fn mark_long_held(&self) {
        self.state.store(STATE_LONG_HELD, Ordering::Relaxed);
    }

    /// Current button lifecycle state.
    pub fn state(&self) -> ButtonState {
        match self.state.load(Ordering::Relaxed) {
            STATE_HELD => ButtonState::Held,
            STATE_LONG_HELD => ButtonState::LongHeld,
            _ => ButtonState::Released,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u8 = 30;

    fn press(button: &ButtonInput, clock: &TickClock, flags: &EventFlags) {
        button.on_touch_report(
            TouchReport {
                touched: true,
                previously_touched: false,
            },
            clock,
            flags,
        );
    }

    fn release(button: &ButtonInput, clock: &TickClock, flags: &EventFlags) {
        button.on_touch_report(
            TouchReport {
                touched: false,
                previously_touched: true,
            },
            clock,
            flags,
        );
    }

    #[test]
    fn test_long_press_fires_on_exact_tick() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        press(&button, &clock, &flags);
        assert_eq!(button.state(), ButtonState::Held);

        for i in 1..=u32::from(HOLD) {
            clock.on_tick(&flags, &button);
            assert_eq!(
                flags.take_long_press(),
                i == u32::from(HOLD),
                "after {i} held ticks"
            );
        }
    }

    #[test]
    fn test_long_press_across_second_boundary() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        // Advance to subsecond 96, so the hold spans the wrap.
        for _ in 0..95 {
            clock.on_tick(&flags, &button);
        }
        assert_eq!(clock.subsecond(), 96);

        press(&button, &clock, &flags);
        for i in 1..=u32::from(HOLD) {
            clock.on_tick(&flags, &button);
            assert_eq!(
                flags.take_long_press(),
                i == u32::from(HOLD),
                "after {i} held ticks"
            );
        }
    }

    #[test]
    fn test_long_press_fires_once_while_held() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        press(&button, &clock, &flags);
        for _ in 0..400 {
            clock.on_tick(&flags, &button);
        }
        assert!(flags.take_long_press());
        assert!(!flags.take_long_press());
    }

    #[test]
    fn test_short_release_before_threshold() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        press(&button, &clock, &flags);
        for _ in 0..5 {
            clock.on_tick(&flags, &button);
        }
        release(&button, &clock, &flags);

        assert!(flags.take_short_release());
        assert_eq!(button.state(), ButtonState::Released);

        // Disarmed: no stale long press later.
        for _ in 0..200 {
            clock.on_tick(&flags, &button);
        }
        assert!(!flags.take_long_press());
    }

    #[test]
    fn test_no_short_release_after_long_press() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        press(&button, &clock, &flags);
        for _ in 0..u32::from(HOLD) {
            clock.on_tick(&flags, &button);
        }
        assert!(flags.take_long_press());
        button.mark_long_held();

        release(&button, &clock, &flags);
        assert!(!flags.take_short_release());
        assert_eq!(button.state(), ButtonState::Released);
    }

    #[test]
    fn test_no_change_report_is_ignored() {
        let clock = TickClock::new();
        let flags = EventFlags::new();
        let button = ButtonInput::new(HOLD);

        button.on_touch_report(
            TouchReport {
                touched: true,
                previously_touched: true,
            },
            &clock,
            &flags,
        );
        assert_eq!(button.state(), ButtonState::Released);
    }

    #[test]
    fn test_hold_ticks_clamped() {
        let button = ButtonInput::new(0);
        assert_eq!(button.hold_ticks, 1);
        let button = ButtonInput::new(200);
        assert_eq!(button.hold_ticks, TICKS_PER_SECOND - 1);
    }
}
