//! High-speed UART register block.
//!
//! The HSUART is a PrimeCell-compatible UART with 16-entry FIFOs and
//! RTS/CTS handshake support.

/// Memory-mapped HSUART registers.
#[repr(C)]
pub struct Registers {
    pub dr: u32,
    pub rsr_ecr: u32,
    _reserved0: [u32; 4],
    pub fr: u32,
    _reserved1: u32,
    pub ilpr: u32,
    pub ibrd: u32,
    pub fbrd: u32,
    pub lcrh: u32,
    pub cr: u32,
    pub ifls: u32,
    pub imsc: u32,
    pub ris: u32,
    pub mis: u32,
    pub icr: u32,
    pub dmacr: u32,
}

/// Depth of both hardware FIFOs, in bytes.
pub const FIFO_DEPTH: usize = 16;

// Data Register (DR)
pub const DR_DATA_MASK: u32 = 0xFF;

// Flag Register (FR) bits
pub const FR_BUSY: u32 = 1 << 3;
pub const FR_RXFE: u32 = 1 << 4;
pub const FR_TXFF: u32 = 1 << 5;
pub const FR_RXFF: u32 = 1 << 6;
pub const FR_TXFE: u32 = 1 << 7;

// Line Control Register (LCRH) bits
pub const LCRH_PEN: u32 = 1 << 1;
pub const LCRH_EPS: u32 = 1 << 2;
pub const LCRH_STP2: u32 = 1 << 3;
pub const LCRH_FEN: u32 = 1 << 4;
pub const LCRH_WLEN_SHIFT: u32 = 5;

// Control Register (CR) bits
pub const CR_UARTEN: u32 = 1 << 0;
pub const CR_TXE: u32 = 1 << 8;
pub const CR_RXE: u32 = 1 << 9;
pub const CR_RTSEN: u32 = 1 << 14;
pub const CR_CTSEN: u32 = 1 << 15;

// Interrupt FIFO Level Select (IFLS) fields
pub const IFLS_TXIFLSEL_SHIFT: u32 = 0;
pub const IFLS_RXIFLSEL_SHIFT: u32 = 3;

/// Every interrupt source of the ICR.
pub const ICR_ALL: u32 = 0x07FF;
