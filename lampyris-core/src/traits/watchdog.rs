//! Watchdog liveness guard trait

/// Trait for the hardware watchdog timer.
///
/// The watchdog bounds the worst-case unresponsiveness of the main
/// loop: the dispatcher pets it once per pass, and a pass that stalls
/// beyond the configured period resets the whole device. That reset is
/// the system's sole failure-recovery mechanism, so implementations
/// must not silently disable themselves.
///
/// The period is fixed when the implementation is constructed; both
/// operations are plain register writes and cannot fail.
pub trait Watchdog {
    /// Arm the watchdog with its configured period.
    fn start(&mut self);

    /// Re-arm (pet) the watchdog. Must be called at least once per
    /// period or the device resets.
    fn pet(&mut self);
}
