//! Hardware abstraction traits
//!
//! These traits define the interface between the runtime core and
//! hardware-specific implementations.

pub mod hooks;
pub mod touch;
pub mod watchdog;

pub use hooks::EventHooks;
pub use touch::{TouchReport, TouchSource};
pub use watchdog::Watchdog;
