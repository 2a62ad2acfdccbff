//! Shared state and wake signalling between tasks
//!
//! The core state cells are plain statics (their constructors are
//! const) shared by reference between the tick task and the
//! dispatcher. The wake signal is the only embassy-sync primitive:
//! producers raise a flag, then signal a wake; the badge task drains
//! all pending flags per wake.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use lampyris_core::button::ButtonInput;
use lampyris_core::clock::TickClock;
use lampyris_core::config::BadgeConfig;
use lampyris_core::events::EventFlags;

/// Flash-time configuration. Edit and rebuild to customize.
pub const CONFIG: BadgeConfig = BadgeConfig::DEFAULT;

/// Pending-event flags, raised by the tick and thermal tasks and
/// drained by the dispatcher.
pub static FLAGS: EventFlags = EventFlags::new();

/// The 100 Hz time base.
pub static CLOCK: TickClock = TickClock::new();

/// Button shared state (hold target, armed bit).
pub static BUTTON: ButtonInput = ButtonInput::new(CONFIG.hold_ticks);

/// Main-loop wake request. Multiple signals between dispatcher passes
/// coalesce into one; the flags carry the actual work.
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
