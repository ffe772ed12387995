//! NRC7292 SoC
//!
//! Four HSUART instances, a Cortex-M NVIC and a GPIO pin mux. Register
//! addresses come from the board support package when the bank is built.

mod gpio;
mod interrupt;

pub use gpio::{Nrc7292PinMux, SELECT_SLOTS};
pub use interrupt::Nvic;

use crate::hal::interrupt::{HandlerTable, IrqNumber};
use crate::hal::serial::UartBank;
use crate::hif::{BufferedInterruptTransport, HifUart};
use crate::peripheral::hsuart::HsUart;
use common::arch::CurrentIrq;

/// HSUART instances on the SoC.
pub const UART_COUNT: usize = 4;

/// Handlers for every NVIC vector. The vector table stubs call
/// [`dispatch_irq`], which routes through this table.
pub static HANDLERS: HandlerTable = HandlerTable::new();

/// Host interface UART as wired on this SoC.
pub type HostUart =
    HifUart<BufferedInterruptTransport<CurrentIrq>, Nrc7292Uarts, Nrc7292PinMux, Nvic>;

/// Location of one HSUART.
#[derive(Debug, Copy, Clone)]
pub struct UartResource {
    pub base: usize,
    pub vector: IrqNumber,
}

/// The SoC's HSUART bank.
#[derive(Debug)]
pub struct Nrc7292Uarts {
    uarts: [UartResource; UART_COUNT],
    clock_hz: u32,
}

impl Nrc7292Uarts {
    /// # Safety
    ///
    /// Every `base` must point at a mapped HSUART clocked at `clock_hz`,
    /// raising the paired NVIC `vector`.
    pub const unsafe fn new(uarts: [UartResource; UART_COUNT], clock_hz: u32) -> Self {
        Self { uarts, clock_hz }
    }
}

impl UartBank for Nrc7292Uarts {
    type Port = HsUart;

    fn port(&self, channel: u8) -> Option<HsUart> {
        let uart = self.uarts.get(channel as usize)?;
        // SAFETY: upheld by `Nrc7292Uarts::new`
        Some(unsafe { HsUart::new(uart.base, self.clock_hz) })
    }

    fn vector(&self, channel: u8) -> Option<IrqNumber> {
        self.uarts.get(channel as usize).map(|uart| uart.vector)
    }
}

/// Route `irq` to its registered handler. Call from the vector stubs.
pub fn dispatch_irq(irq: IrqNumber) {
    HANDLERS.dispatch(irq);
}
