//! Host Interface UART
//!
//! Serial link to an external host processor. One channel at a time is
//! open; received bytes are buffered by the interrupt handler until read,
//! written bytes are buffered until the hardware FIFO has room.
//!
//! # Layers
//!
//! - [`config`]: channel/baud/flow-control rules
//! - [`fifo`]: fixed-capacity byte ring
//! - [`transport`]: buffered or direct data movement
//! - [`isr`]: interrupt-context service routines
//! - [`pins`]: pin routing per channel
//! - [`uart`]: the driver itself

pub mod config;
pub mod error;
pub mod fifo;
pub mod isr;
pub mod pins;
pub mod transport;
pub mod uart;

#[cfg(test)]
mod mock;

pub use config::UartConfig;
pub use error::HifError;
pub use transport::{BufferedInterruptTransport, DirectPollingTransport, Transport};
pub use uart::{CloseStatus, HifUart};
