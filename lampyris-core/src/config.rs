//! Configuration type definitions
//!
//! Board-agnostic badge configuration. There is no field-editable
//! config surface on the badge; these values are fixed at flash time.
//! The `serde` derives exist for the external persistence collaborator,
//! which snapshots configuration alongside the elapsed-seconds clock.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Badge runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BadgeConfig {
    /// Number of addressable composite RGB LEDs.
    pub led_count: u8,
    /// Display brightness at power-on, `[0x01, 0x40]`.
    pub default_brightness: u8,
    /// Button hold duration for a long press, in 100 Hz ticks.
    pub hold_ticks: u8,
    /// Upper temperature bound in degrees Fahrenheit.
    pub thermal_hot_f: i16,
    /// Lower temperature bound in degrees Fahrenheit.
    pub thermal_cold_f: i16,
    /// Watchdog period in milliseconds.
    pub watchdog_period_ms: u32,
}

impl BadgeConfig {
    /// The production badge. Const so firmware statics can be sized
    /// and armed from it.
    pub const DEFAULT: Self = Self {
        led_count: 9,
        default_brightness: 0x30,
        hold_ticks: 75,
        thermal_hot_f: 105,
        thermal_cold_f: 45,
        watchdog_period_ms: 1000,
    };
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = BadgeConfig::default();
        assert_eq!(config.led_count, 9);
        assert!(config.hold_ticks < crate::clock::TICKS_PER_SECOND);
        assert!(config.thermal_cold_f < config.thermal_hot_f);
    }
}
