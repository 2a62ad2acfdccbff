//! Cooperative event dispatcher
//!
//! The body of the badge's main loop. The firmware sleeps until an
//! interrupt requests a wake, then calls [`Dispatcher::run_pass`] once
//! and goes back to sleep. Each pass drains the event flags in a fixed
//! priority order: the time-critical tick first, then the second, the
//! button events, the thermal events, and the touch-library
//! housekeeping last.
//!
//! Each check-and-clear is independent. A flag raised while a pass is
//! in progress is serviced on the next pass, never the current one;
//! the producer also signals a wake, so that next pass is never lost.
//!
//! The only loop-level failure mode is a stall: if a collaborator call
//! keeps a pass running past the watchdog period, the watchdog resets
//! the device. Nothing here busy-waits.

use crate::button::ButtonInput;
use crate::clock::TickClock;
use crate::events::EventFlags;
use crate::traits::{EventHooks, TouchSource, Watchdog};

/// The badge main-loop dispatcher.
///
/// Owns the collaborators (watchdog, hooks, touch source) and borrows
/// the process-wide shared state cells.
pub struct Dispatcher<'a, W, H, T>
where
    W: Watchdog,
    H: EventHooks,
    T: TouchSource,
{
    flags: &'a EventFlags,
    clock: &'a TickClock,
    button: &'a ButtonInput,
    watchdog: W,
    hooks: H,
    touch: T,
}

impl<'a, W, H, T> Dispatcher<'a, W, H, T>
where
    W: Watchdog,
    H: EventHooks,
    T: TouchSource,
{
    /// Create a dispatcher and arm the watchdog.
    pub fn new(
        flags: &'a EventFlags,
        clock: &'a TickClock,
        button: &'a ButtonInput,
        mut watchdog: W,
        hooks: H,
        touch: T,
    ) -> Self {
        watchdog.start();
        Self {
            flags,
            clock,
            button,
            watchdog,
            hooks,
            touch,
        }
    }

    /// Service one wake: pet the watchdog, then drain the flags in
    /// fixed priority order.
    pub fn run_pass(&mut self) {
        // Pet first, unconditionally. This bounds loop stall time
        // regardless of which flags are pending.
        self.watchdog.pet();

        if self.flags.take_tick() {
            self.hooks.on_animation_tick();
        }

        if self.flags.take_second() {
            let elapsed = self.clock.advance_second();
            self.hooks.on_second(elapsed);
        }

        if self.flags.take_long_press() {
            self.button.mark_long_held();
            self.hooks.on_long_press();
        }

        if self.flags.take_short_release() {
            self.hooks.on_short_release();
        }

        if self.flags.take_thermal_hot() {
            self.hooks.on_thermal_hot();
        }

        if self.flags.take_thermal_cold() {
            self.hooks.on_thermal_cold();
        }

        // Touch-library housekeeping runs last; a resulting edge is
        // recorded now and its flags are serviced on the next pass.
        if self.flags.take_touch_service() {
            if let Some(report) = self.touch.update() {
                self.button.on_touch_report(report, self.clock, self.flags);
            }
        }
    }

    /// Access the application hooks (for state owned by the hooks,
    /// e.g. the display driver).
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use heapless::Vec;

    use super::*;
    use crate::traits::TouchReport;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Serviced {
        Tick,
        Second(u32),
        LongPress,
        ShortRelease,
        ThermalHot,
        ThermalCold,
        TouchUpdate,
    }

    /// Hooks that record servicing order into a shared log.
    struct RecordingHooks<'a> {
        log: &'a RefCell<Vec<Serviced, 16>>,
        /// Flag raised from inside the tick hook, to prove mid-pass
        /// raises wait for the next pass.
        raise_hot_on_tick: Option<&'a EventFlags>,
    }

    impl EventHooks for RecordingHooks<'_> {
        fn on_animation_tick(&mut self) {
            self.log.borrow_mut().push(Serviced::Tick).unwrap();
            if let Some(flags) = self.raise_hot_on_tick {
                flags.raise_thermal_hot();
            }
        }

        fn on_second(&mut self, elapsed: u32) {
            self.log.borrow_mut().push(Serviced::Second(elapsed)).unwrap();
        }

        fn on_long_press(&mut self) {
            self.log.borrow_mut().push(Serviced::LongPress).unwrap();
        }

        fn on_short_release(&mut self) {
            self.log.borrow_mut().push(Serviced::ShortRelease).unwrap();
        }

        fn on_thermal_hot(&mut self) {
            self.log.borrow_mut().push(Serviced::ThermalHot).unwrap();
        }

        fn on_thermal_cold(&mut self) {
            self.log.borrow_mut().push(Serviced::ThermalCold).unwrap();
        }
    }

    /// Watchdog driven by a simulated millisecond clock. Records a
    /// reset when a pet arrives later than one period after the last.
    struct SimWatchdog<'a> {
        now_ms: &'a Cell<u32>,
        period_ms: u32,
        last_pet_ms: u32,
        pets: u32,
        reset_fired: &'a Cell<bool>,
    }

    impl<'a> SimWatchdog<'a> {
        fn new(now_ms: &'a Cell<u32>, period_ms: u32, reset_fired: &'a Cell<bool>) -> Self {
            Self {
                now_ms,
                period_ms,
                last_pet_ms: 0,
                pets: 0,
                reset_fired,
            }
        }
    }

    impl Watchdog for SimWatchdog<'_> {
        fn start(&mut self) {
            self.last_pet_ms = self.now_ms.get();
        }

        fn pet(&mut self) {
            let now = self.now_ms.get();
            if now - self.last_pet_ms > self.period_ms {
                self.reset_fired.set(true);
            }
            self.last_pet_ms = now;
            self.pets += 1;
        }
    }

    /// Touch source that serves queued reports.
    struct QueuedTouch {
        report: Option<TouchReport>,
        updates: u32,
    }

    impl TouchSource for QueuedTouch {
        fn update(&mut self) -> Option<TouchReport> {
            self.updates += 1;
            self.report.take()
        }
    }

    struct Fixture {
        flags: EventFlags,
        clock: TickClock,
        button: ButtonInput,
        now_ms: Cell<u32>,
        reset_fired: Cell<bool>,
        log: RefCell<Vec<Serviced, 16>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                flags: EventFlags::new(),
                clock: TickClock::new(),
                button: ButtonInput::new(30),
                now_ms: Cell::new(0),
                reset_fired: Cell::new(false),
                log: RefCell::new(Vec::new()),
            }
        }

        fn dispatcher(
            &self,
            raise_hot_on_tick: bool,
            touch_report: Option<TouchReport>,
        ) -> Dispatcher<'_, SimWatchdog<'_>, RecordingHooks<'_>, QueuedTouch> {
            Dispatcher::new(
                &self.flags,
                &self.clock,
                &self.button,
                SimWatchdog::new(&self.now_ms, 1000, &self.reset_fired),
                RecordingHooks {
                    log: &self.log,
                    raise_hot_on_tick: raise_hot_on_tick.then_some(&self.flags),
                },
                QueuedTouch {
                    report: touch_report,
                    updates: 0,
                },
            )
        }
    }

    #[test]
    fn test_fixed_service_order() {
        let fx = Fixture::new();
        let mut dispatcher = fx.dispatcher(false, None);

        fx.flags.raise_touch_service();
        fx.flags.raise_thermal_cold();
        fx.flags.raise_thermal_hot();
        fx.flags.raise_short_release();
        fx.flags.raise_long_press();
        fx.flags.raise_second();
        fx.flags.raise_tick();

        dispatcher.run_pass();

        assert_eq!(
            fx.log.borrow().as_slice(),
            &[
                Serviced::Tick,
                Serviced::Second(1),
                Serviced::LongPress,
                Serviced::ShortRelease,
                Serviced::ThermalHot,
                Serviced::ThermalCold,
            ]
        );
        assert_eq!(dispatcher.touch.updates, 1);
    }

    #[test]
    fn test_watchdog_petted_every_pass() {
        let fx = Fixture::new();
        let mut dispatcher = fx.dispatcher(false, None);

        for _ in 0..5 {
            dispatcher.run_pass();
        }
        assert_eq!(dispatcher.watchdog.pets, 5);
        assert!(!fx.reset_fired.get());
    }

    #[test]
    fn test_stalled_pass_trips_watchdog() {
        struct StallingHooks<'a> {
            now_ms: &'a Cell<u32>,
        }

        impl EventHooks for StallingHooks<'_> {
            fn on_animation_tick(&mut self) {
                // Unbounded collaborator call: burns 1.5 watchdog periods.
                self.now_ms.set(self.now_ms.get() + 1500);
            }
        }

        let fx = Fixture::new();
        let mut dispatcher = Dispatcher::new(
            &fx.flags,
            &fx.clock,
            &fx.button,
            SimWatchdog::new(&fx.now_ms, 1000, &fx.reset_fired),
            StallingHooks { now_ms: &fx.now_ms },
            QueuedTouch {
                report: None,
                updates: 0,
            },
        );

        fx.flags.raise_tick();
        dispatcher.run_pass();
        assert!(!fx.reset_fired.get());

        // The next pet arrives past the period: reset, not a hang.
        dispatcher.run_pass();
        assert!(fx.reset_fired.get());
    }

    #[test]
    fn test_flag_raised_mid_pass_waits_for_next_pass() {
        let fx = Fixture::new();
        let mut dispatcher = fx.dispatcher(true, None);

        fx.flags.raise_tick();
        dispatcher.run_pass();
        assert_eq!(fx.log.borrow().as_slice(), &[Serviced::Tick]);

        dispatcher.run_pass();
        assert_eq!(
            fx.log.borrow().as_slice(),
            &[Serviced::Tick, Serviced::ThermalHot]
        );
    }

    #[test]
    fn test_touch_report_feeds_button() {
        let fx = Fixture::new();
        let mut dispatcher = fx.dispatcher(
            false,
            Some(TouchReport {
                touched: true,
                previously_touched: false,
            }),
        );

        fx.flags.raise_touch_service();
        dispatcher.run_pass();

        assert_eq!(fx.button.state(), crate::button::ButtonState::Held);
    }

    #[test]
    fn test_long_press_marks_button_long_held() {
        let fx = Fixture::new();
        let mut dispatcher = fx.dispatcher(false, None);

        fx.button.record_press_start(&fx.clock);
        fx.flags.raise_long_press();
        dispatcher.run_pass();

        assert_eq!(fx.button.state(), crate::button::ButtonState::LongHeld);
        assert_eq!(fx.log.borrow().as_slice(), &[Serviced::LongPress]);
    }
}
