//! NRC7292 interrupt controller (Cortex-M NVIC)

use crate::hal::interrupt::{
    HandlerTable, InterruptController, InterruptHandler, IrqError, IrqNumber, MAX_VECTORS,
};
use core::ptr::{read_volatile, write_volatile};

/// Set-enable registers.
const NVIC_ISER: usize = 0xE000_E100;
/// Clear-enable registers.
const NVIC_ICER: usize = 0xE000_E180;
/// Set-pending registers.
const NVIC_ISPR: usize = 0xE000_E200;
/// Clear-pending registers.
const NVIC_ICPR: usize = 0xE000_E280;

/// Word address and bit of `irq` in a register bank at `base`.
fn locate(base: usize, irq: IrqNumber) -> Result<(*mut u32, u32), IrqError> {
    if irq as usize >= MAX_VECTORS {
        return Err(IrqError::InvalidVector);
    }
    let word = base + (irq as usize / 32) * 4;
    Ok((word as *mut u32, 1 << (irq % 32)))
}

/// NVIC with handlers routed through a [`HandlerTable`].
pub struct Nvic {
    table: &'static HandlerTable,
}

impl Nvic {
    /// # Safety
    ///
    /// Must run on a Cortex-M core where the NVIC is at its architectural
    /// address, and `table` must be the one the vector stubs dispatch to.
    pub const unsafe fn new(table: &'static HandlerTable) -> Self {
        Self { table }
    }
}

impl InterruptController for Nvic {
    type Error = IrqError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        let (reg, bit) = locate(NVIC_ISER, irq)?;
        // Write-one-to-set
        unsafe { write_volatile(reg, bit) };
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        let (reg, bit) = locate(NVIC_ICER, irq)?;
        unsafe { write_volatile(reg, bit) };
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> Result<bool, IrqError> {
        let (reg, bit) = locate(NVIC_ISPR, irq)?;
        Ok(unsafe { read_volatile(reg) } & bit != 0)
    }

    fn clear(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        let (reg, bit) = locate(NVIC_ICPR, irq)?;
        unsafe { write_volatile(reg, bit) };
        Ok(())
    }

    fn register(
        &mut self,
        irq: IrqNumber,
        handler: &'static dyn InterruptHandler,
    ) -> Result<(), IrqError> {
        self.table.register(irq, handler)
    }

    fn unregister(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        self.table.unregister(irq)
    }
}
