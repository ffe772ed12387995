//! Peripheral Drivers
//!
//! This module contains drivers for reusable peripherals that
//! can be found across different platforms.
//!
//! # Available Peripherals
//!
//! - [`hsuart`]: PrimeCell-compatible high-speed UART

pub mod hsuart;
