//! Serial Port (UART) Hardware Abstraction Layer.
//!
//! This module defines the platform-independent view of a UART peripheral
//! used by interrupt-driven transports: line configuration, interrupt
//! sources, and byte-level data/status access.

use core::fmt;

use super::interrupt::IrqNumber;

bitflags::bitflags! {
    /// UART interrupt sources.
    ///
    /// Bit positions follow the PrimeCell mask/status/clear register layout
    /// so that peripheral drivers can write them through unchanged.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct UartInterrupts: u32 {
        /// Receive FIFO reached its trigger level.
        const RX = 1 << 4;
        /// Transmit FIFO dropped to its trigger level.
        const TX = 1 << 5;
        /// Receive timeout: data is waiting below the trigger level.
        const RX_TIMEOUT = 1 << 6;
    }
}

impl UartInterrupts {
    /// Sources serviced by the receive path.
    pub const RECEIVE: Self = Self::RX.union(Self::RX_TIMEOUT);
}

/// Serial port configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Number of data bits per frame.
    pub data_bits: DataBits,
    /// Parity checking mode.
    pub parity: Parity,
    /// Number of stop bits.
    pub stop_bits: StopBits,
    /// Hardware handshake.
    pub flow_control: FlowControl,
}

impl SerialConfig {
    /// Create a standard 8N1 configuration at the specified baud rate.
    ///
    /// 8N1 means: 8 data bits, no parity, 1 stop bit.
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

impl Default for SerialConfig {
    /// Default configuration: 115200 baud, 8N1, no flow control.
    fn default() -> Self {
        Self::new_8n1(115200)
    }
}

/// Number of data bits per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
        })
    }
}

/// Number of stop bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

impl StopBits {
    pub const fn count(self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// Hardware flow control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlowControl {
    /// No handshake lines.
    None,
    /// RTS/CTS handshake.
    RtsCts,
}

impl FlowControl {
    pub const fn is_enabled(self) -> bool {
        matches!(self, FlowControl::RtsCts)
    }
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_enabled() { "on" } else { "off" })
    }
}

/// FIFO interrupt trigger level, as a fraction of the FIFO depth.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FifoLevel {
    OneEighth = 0,
    OneQuarter = 1,
    Half = 2,
    ThreeQuarters = 3,
    SevenEighths = 4,
}

/// Serial port errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// Operation would block but non-blocking mode was requested.
    WouldBlock,
    /// Invalid configuration parameter.
    InvalidConfig,
    /// Other platform-specific error.
    Other,
}

/// A UART peripheral as seen by an interrupt-driven transport.
///
/// All methods take `&self`: the same peripheral is touched from task
/// context and from its interrupt handler, and register access is
/// inherently shared. Read-modify-write of the interrupt mask from task
/// context must happen with local interrupts masked.
pub trait UartPort {
    /// Program frame format, baud rate and flow control, enable the FIFOs
    /// and the peripheral. All interrupt sources are left masked.
    fn configure(&self, config: &SerialConfig) -> Result<(), SerialError>;

    /// Set the FIFO interrupt trigger levels.
    fn set_fifo_levels(&self, tx: FifoLevel, rx: FifoLevel);

    /// Disable the peripheral.
    fn shutdown(&self);

    /// Unmask interrupt sources.
    fn enable_interrupts(&self, sources: UartInterrupts);

    /// Mask interrupt sources.
    fn disable_interrupts(&self, sources: UartInterrupts);

    /// Currently unmasked interrupt sources.
    fn enabled_interrupts(&self) -> UartInterrupts;

    /// Pending interrupt sources, after masking.
    fn interrupt_status(&self) -> UartInterrupts;

    /// Acknowledge pending interrupt sources.
    fn clear_interrupts(&self, sources: UartInterrupts);

    /// Receive FIFO holds no data.
    fn rx_empty(&self) -> bool;

    /// Pop one byte from the receive FIFO. Only valid when `!rx_empty()`.
    fn read_data(&self) -> u8;

    /// Transmit FIFO cannot accept another byte.
    fn tx_full(&self) -> bool;

    /// Transmit FIFO is empty.
    fn tx_empty(&self) -> bool;

    /// Push one byte into the transmit FIFO. Only valid when `!tx_full()`.
    fn write_data(&self, byte: u8);

    /// Try to read a byte without blocking.
    fn try_read_byte(&self) -> Result<u8, SerialError> {
        if self.rx_empty() {
            return Err(SerialError::WouldBlock);
        }
        Ok(self.read_data())
    }

    /// Try to write a byte without blocking.
    fn try_write_byte(&self, byte: u8) -> Result<(), SerialError> {
        if self.tx_full() {
            return Err(SerialError::WouldBlock);
        }
        self.write_data(byte);
        Ok(())
    }
}

/// The set of UART instances on a SoC, addressed by channel number.
pub trait UartBank {
    /// Peripheral handle bound to one channel.
    type Port: UartPort;

    /// Bind a handle to `channel`, or `None` if the SoC has no such UART.
    fn port(&self, channel: u8) -> Option<Self::Port>;

    /// Interrupt vector wired to `channel`.
    fn vector(&self, channel: u8) -> Option<IrqNumber>;
}
