//! Host Interface UART Driver
//!
//! Interrupt-driven serial link between the SoC and an external host,
//! built in layers:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`hw`]: Raw register layouts
//! - [`peripheral`]: Reusable peripheral drivers
//! - [`platform`]: Platform-specific drivers (SoC level)
//! - [`hif`]: The host interface driver on top of the HAL
//!
//! # Usage Example
//!
//! ```no_run
//! use drivers::hif::UartConfig;
//! use drivers::platform::current::HostUart;
//!
//! fn start(uart: &'static HostUart) {
//!     let config = UartConfig::new_8n1(2, 921_600).with_flow_control();
//!     uart.open(&config, 1024, 1024).ok();
//!     uart.write(b"READY\r\n");
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod hal;
pub mod hif;
pub mod hw;
pub mod peripheral;
pub mod platform;

// Re-export commonly used types
pub use hal::interrupt::{InterruptController, InterruptHandler};
pub use hal::serial::{SerialConfig, UartBank, UartPort};
pub use hif::{HifError, HifUart, UartConfig};
