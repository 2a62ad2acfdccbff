//! Embassy async tasks
//!
//! Each task runs independently; the tick and thermal tasks produce
//! event flags, the badge task drains them.

pub mod badge;
pub mod thermal;
pub mod tick;

pub use badge::badge_task;
pub use thermal::thermal_task;
pub use tick::tick_task;
