//! Synchronization primitives shared by the driver crates.
//!
//! Everything here is `no_std`; hosted builds (unit tests) swap the
//! architecture interrupt mask for [`sync::irq::NoIrq`].

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod sync;
