//! Interrupt Controller Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for interrupt management
//! and the handler table that routes a vector to a driver instance.

use common::arch::CurrentIrq;
use common::sync::IrqSpinLock;

/// Interrupt number type.
pub type IrqNumber = u32;

/// Number of vectors a [`HandlerTable`] can route.
pub const MAX_VECTORS: usize = 64;

/// Something that services an interrupt vector.
///
/// Handlers run in interrupt context: they must not block.
pub trait InterruptHandler: Sync {
    fn handle(&self, irq: IrqNumber);
}

/// Interrupt controller trait.
///
/// This trait represents the system's interrupt controller.
pub trait InterruptController {
    /// Error type for interrupt controller operations.
    type Error: core::fmt::Debug;

    /// Enable (unmask) an interrupt line.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Disable (mask) an interrupt line.
    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Check if an interrupt is currently pending.
    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error>;

    /// Clear a pending interrupt.
    ///
    /// Some controllers require explicit acknowledgment.
    fn clear(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        let _ = irq;
        Ok(())
    }

    /// Route `irq` to `handler`.
    fn register(
        &mut self,
        irq: IrqNumber,
        handler: &'static dyn InterruptHandler,
    ) -> Result<(), Self::Error>;

    /// Route `irq` back to the no-op default.
    fn unregister(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;
}

/// Interrupt routing errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IrqError {
    /// Vector is outside the table.
    InvalidVector,
}

/// Vector to handler routing.
///
/// Unregistered vectors dispatch to nothing.
pub struct HandlerTable {
    slots: IrqSpinLock<[Option<&'static dyn InterruptHandler>; MAX_VECTORS], CurrentIrq>,
}

impl HandlerTable {
    pub const fn new() -> Self {
        Self {
            slots: IrqSpinLock::new([None; MAX_VECTORS]),
        }
    }

    pub fn register(
        &self,
        irq: IrqNumber,
        handler: &'static dyn InterruptHandler,
    ) -> Result<(), IrqError> {
        let slot = Self::index(irq)?;
        self.slots.lock()[slot] = Some(handler);
        Ok(())
    }

    pub fn unregister(&self, irq: IrqNumber) -> Result<(), IrqError> {
        let slot = Self::index(irq)?;
        self.slots.lock()[slot] = None;
        Ok(())
    }

    pub fn is_registered(&self, irq: IrqNumber) -> bool {
        Self::index(irq).is_ok_and(|slot| self.slots.lock()[slot].is_some())
    }

    /// Invoke the handler registered for `irq`.
    ///
    /// The table lock is released before the handler runs, so a handler may
    /// itself touch the table.
    pub fn dispatch(&self, irq: IrqNumber) {
        let handler = match Self::index(irq) {
            Ok(slot) => self.slots.lock()[slot],
            Err(_) => None,
        };

        match handler {
            Some(handler) => handler.handle(irq),
            None => log::trace!("Unhandled IRQ: {}", irq),
        }
    }

    fn index(irq: IrqNumber) -> Result<usize, IrqError> {
        let slot = irq as usize;
        if slot < MAX_VECTORS {
            Ok(slot)
        } else {
            Err(IrqError::InvalidVector)
        }
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}
