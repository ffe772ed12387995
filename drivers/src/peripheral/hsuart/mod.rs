//! HSUART Driver
//!
//! Register-level driver for the PrimeCell-compatible high-speed UART.
//! This is the only code that touches the UART's memory-mapped registers;
//! everything above it goes through [`UartPort`].
//!
//! # Features
//!
//! - Configurable baud rate, frame format and RTS/CTS flow control
//! - 16-byte FIFOs with programmable interrupt trigger levels
//! - Non-blocking byte access
//!
//! # Example
//!
//! ```no_run
//! use drivers::hal::serial::{SerialConfig, UartPort};
//! use drivers::peripheral::hsuart::HsUart;
//!
//! let uart = unsafe { HsUart::new(0x4000_8000, 40_000_000) };
//! uart.configure(&SerialConfig::new_8n1(115200)).unwrap();
//! let _ = uart.try_write_byte(b'!');
//! ```

use crate::hal::serial::{
    DataBits, FifoLevel, Parity, SerialConfig, SerialError, StopBits, UartInterrupts, UartPort,
};
use crate::hw::hsuart::*;
use core::mem::offset_of;
use core::ptr::{read_volatile, write_volatile};

const DR_OFFSET: usize = offset_of!(Registers, dr);
const FR_OFFSET: usize = offset_of!(Registers, fr);
const IBRD_OFFSET: usize = offset_of!(Registers, ibrd);
const FBRD_OFFSET: usize = offset_of!(Registers, fbrd);
const LCRH_OFFSET: usize = offset_of!(Registers, lcrh);
const CR_OFFSET: usize = offset_of!(Registers, cr);
const IFLS_OFFSET: usize = offset_of!(Registers, ifls);
const IMSC_OFFSET: usize = offset_of!(Registers, imsc);
const MIS_OFFSET: usize = offset_of!(Registers, mis);
const ICR_OFFSET: usize = offset_of!(Registers, icr);

/// HSUART driver bound to one instance.
#[derive(Debug, Copy, Clone)]
pub struct HsUart {
    base: usize,
    clock_hz: u32,
}

impl HsUart {
    /// Create a new HSUART handle.
    ///
    /// # Safety
    ///
    /// - `base` must point to a valid HSUART register block
    /// - Memory must be mapped as device memory
    /// - `clock_hz` must be the UART reference clock
    pub const unsafe fn new(base: usize, clock_hz: u32) -> Self {
        Self { base, clock_hz }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Wait for the UART to finish transmitting.
    fn wait_idle(&self) {
        while self.read_reg(FR_OFFSET) & FR_BUSY != 0 {
            core::hint::spin_loop();
        }
    }

    /// Calculate baud rate divisors.
    fn calculate_divisors(clock_hz: u32, baud_rate: u32) -> Result<(u32, u32), SerialError> {
        if baud_rate == 0 {
            return Err(SerialError::InvalidConfig);
        }

        // BAUDDIV = FUARTCLK / (16 * baud), 6 fractional bits
        let divisor = ((clock_hz as u64) << 6) / (16 * baud_rate as u64);

        let integer = (divisor >> 6) as u32;
        let fractional = (divisor & 0x3F) as u32;

        if integer == 0 || integer > 0xFFFF {
            return Err(SerialError::InvalidConfig);
        }

        Ok((integer, fractional))
    }

    fn line_control(config: &SerialConfig) -> u32 {
        let wlen = match config.data_bits {
            DataBits::Five => 0b00,
            DataBits::Six => 0b01,
            DataBits::Seven => 0b10,
            DataBits::Eight => 0b11,
        };

        let mut lcrh = (wlen << LCRH_WLEN_SHIFT) | LCRH_FEN;
        match config.parity {
            Parity::None => {}
            Parity::Odd => lcrh |= LCRH_PEN,
            Parity::Even => lcrh |= LCRH_PEN | LCRH_EPS,
        }
        if config.stop_bits == StopBits::Two {
            lcrh |= LCRH_STP2;
        }
        lcrh
    }
}

impl UartPort for HsUart {
    fn configure(&self, config: &SerialConfig) -> Result<(), SerialError> {
        let (ibrd, fbrd) = Self::calculate_divisors(self.clock_hz, config.baud_rate)?;

        // Disable UART
        let cr = self.read_reg(CR_OFFSET);
        self.write_reg(CR_OFFSET, cr & !CR_UARTEN);

        self.wait_idle();

        // Flush FIFOs
        let lcrh = self.read_reg(LCRH_OFFSET);
        self.write_reg(LCRH_OFFSET, lcrh & !LCRH_FEN);

        self.write_reg(IBRD_OFFSET, ibrd);
        self.write_reg(FBRD_OFFSET, fbrd);

        // LCRH must follow the divisors: the write latches all three
        self.write_reg(LCRH_OFFSET, Self::line_control(config));

        self.write_reg(IMSC_OFFSET, 0);
        self.write_reg(ICR_OFFSET, ICR_ALL);

        let mut cr = CR_UARTEN | CR_TXE | CR_RXE;
        if config.flow_control.is_enabled() {
            cr |= CR_RTSEN | CR_CTSEN;
        }
        self.write_reg(CR_OFFSET, cr);

        Ok(())
    }

    fn set_fifo_levels(&self, tx: FifoLevel, rx: FifoLevel) {
        self.write_reg(
            IFLS_OFFSET,
            ((tx as u32) << IFLS_TXIFLSEL_SHIFT) | ((rx as u32) << IFLS_RXIFLSEL_SHIFT),
        );
    }

    fn shutdown(&self) {
        self.write_reg(IMSC_OFFSET, 0);
        self.write_reg(ICR_OFFSET, ICR_ALL);
        self.wait_idle();
        self.write_reg(CR_OFFSET, 0);
    }

    fn enable_interrupts(&self, sources: UartInterrupts) {
        let imsc = self.read_reg(IMSC_OFFSET);
        self.write_reg(IMSC_OFFSET, imsc | sources.bits());
    }

    fn disable_interrupts(&self, sources: UartInterrupts) {
        let imsc = self.read_reg(IMSC_OFFSET);
        self.write_reg(IMSC_OFFSET, imsc & !sources.bits());
    }

    fn enabled_interrupts(&self) -> UartInterrupts {
        UartInterrupts::from_bits_truncate(self.read_reg(IMSC_OFFSET))
    }

    fn interrupt_status(&self) -> UartInterrupts {
        UartInterrupts::from_bits_truncate(self.read_reg(MIS_OFFSET))
    }

    fn clear_interrupts(&self, sources: UartInterrupts) {
        self.write_reg(ICR_OFFSET, sources.bits());
    }

    fn rx_empty(&self) -> bool {
        self.read_reg(FR_OFFSET) & FR_RXFE != 0
    }

    fn read_data(&self) -> u8 {
        (self.read_reg(DR_OFFSET) & DR_DATA_MASK) as u8
    }

    fn tx_full(&self) -> bool {
        self.read_reg(FR_OFFSET) & FR_TXFF != 0
    }

    fn tx_empty(&self) -> bool {
        self.read_reg(FR_OFFSET) & FR_TXFE != 0
    }

    fn write_data(&self, byte: u8) {
        self.write_reg(DR_OFFSET, byte as u32);
    }
}

// SAFETY: HsUart wraps memory-mapped hardware; callers serialize
// read-modify-write sequences with interrupt masking.
unsafe impl Send for HsUart {}
unsafe impl Sync for HsUart {}
