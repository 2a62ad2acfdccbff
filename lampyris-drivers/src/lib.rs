//! Hardware driver implementations
//!
//! This crate provides the drivers the badge runtime talks to:
//!
//! - HT16D35A RGB LED matrix controller (SPI)
//!
//! Drivers are generic over the `embedded-hal` bus traits so the same
//! code runs against the real SPI peripheral and against the mock
//! buses used in the host test suite.

#![no_std]
#![deny(unsafe_code)]

pub mod ht16d35a;

pub use ht16d35a::{AddressMap, Ht16d35a, Rgb16, Rgb8};
