//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with hardware
//! peripherals. These traits are implemented by platform-specific
//! and peripheral drivers, allowing the host interface to be written
//! in a platform-independent manner.
//!
//! # Available Interfaces
//!
//! - [`gpio`]: Pin multiplexing
//! - [`serial`]: Serial port (UART) peripherals
//! - [`interrupt`]: Interrupt controller and handler routing

pub mod gpio;
pub mod interrupt;
pub mod serial;
