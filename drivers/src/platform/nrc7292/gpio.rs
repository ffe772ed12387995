//! NRC7292 pin multiplexer

use crate::hal::gpio::{PinMux, PinMuxError};
use core::ptr::{read_volatile, write_volatile};

/// Number of UIO select words, one per UART.
pub const SELECT_SLOTS: u8 = 4;

/// GPIO alternate-function register plus the UIO select words.
#[derive(Debug)]
pub struct Nrc7292PinMux {
    alt: usize,
    select: usize,
}

impl Nrc7292PinMux {
    /// # Safety
    ///
    /// `alt` must be the GPIO_ALT0 register and `select` the first of
    /// [`SELECT_SLOTS`] consecutive UIO select registers, both mapped.
    pub const unsafe fn new(alt: usize, select: usize) -> Self {
        Self { alt, select }
    }

    fn select_reg(&self, slot: u8) -> Result<*mut u32, PinMuxError> {
        if slot < SELECT_SLOTS {
            Ok((self.select + slot as usize * 4) as *mut u32)
        } else {
            Err(PinMuxError::InvalidSlot)
        }
    }
}

impl PinMux for Nrc7292PinMux {
    type Error = PinMuxError;

    fn alt_function(&self) -> u32 {
        unsafe { read_volatile(self.alt as *const u32) }
    }

    fn set_alt_function(&mut self, word: u32) -> Result<(), PinMuxError> {
        unsafe { write_volatile(self.alt as *mut u32, word) };
        Ok(())
    }

    fn select(&self, slot: u8) -> Result<u32, PinMuxError> {
        let reg = self.select_reg(slot)?;
        Ok(unsafe { read_volatile(reg) })
    }

    fn set_select(&mut self, slot: u8, word: u32) -> Result<(), PinMuxError> {
        let reg = self.select_reg(slot)?;
        unsafe { write_volatile(reg, word) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_in_memory() {
        let mut regs = [0u32; 1 + SELECT_SLOTS as usize];
        let alt = regs.as_mut_ptr() as usize;
        let mut mux = unsafe { Nrc7292PinMux::new(alt, alt + 4) };

        mux.set_alt_function(0x0F).unwrap();
        mux.set_select(3, 0xFFFF_0706).unwrap();
        assert_eq!(mux.alt_function(), 0x0F);
        assert_eq!(mux.select(3), Ok(0xFFFF_0706));
        assert_eq!(mux.set_select(4, 0), Err(PinMuxError::InvalidSlot));
    }
}
