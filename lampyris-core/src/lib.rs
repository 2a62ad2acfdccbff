//! Board-agnostic real-time core for the Lampyris badge firmware
//!
//! This crate contains the runtime logic that does not depend on
//! specific hardware implementations:
//!
//! - Monotonic time base driven by a 100 Hz tick interrupt
//! - One-shot event flags between interrupt context and the main loop
//! - Button edge derivation and long-press detection
//! - The cooperative event dispatcher (main loop body)
//! - Hardware abstraction traits (watchdog, touch source, event hooks)
//! - Configuration type definitions
//!
//! Everything here runs single-threaded. Interrupt handlers only touch
//! the shared atomic cells ([`events::EventFlags`], [`clock::TickClock`],
//! [`button::ButtonInput`]) and request a wake; all substantive work
//! happens in [`dispatcher::Dispatcher::run_pass`].

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod events;
pub mod traits;
