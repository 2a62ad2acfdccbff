//! Event hooks trait
//!
//! The dispatcher decides *when*; the application decides *what*. All
//! animation content, persistence, and thermal policy live behind this
//! seam, outside the core.

/// Application hooks invoked by the dispatcher, one per serviced flag.
///
/// All methods default to no-ops so an application only implements the
/// events it cares about. Implementations must stay bounded: a hook
/// that outlives the watchdog period resets the badge.
pub trait EventHooks {
    /// 100 Hz animation/debounce timestep.
    fn on_animation_tick(&mut self) {}

    /// One second elapsed; `elapsed` is the new seconds count.
    /// Periodic work (persistence, scheduled bling) keys off modulo
    /// intervals of this value.
    fn on_second(&mut self, elapsed: u32) {
        let _ = elapsed;
    }

    /// The button was held past the configured hold duration.
    fn on_long_press(&mut self) {}

    /// The button was released before the hold duration expired.
    fn on_short_release(&mut self) {}

    /// Temperature crossed the hot bound.
    fn on_thermal_hot(&mut self) {}

    /// Temperature crossed the cold bound.
    fn on_thermal_cold(&mut self) {}
}
