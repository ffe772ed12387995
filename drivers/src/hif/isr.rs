//! Interrupt-context service routines of the host interface UART.
//!
//! The receive path drains the hardware FIFO into the receive buffer until
//! either side runs out. When the buffer has no room the receive sources are
//! masked instead: bytes stay in the hardware FIFO, RTS deasserts, and the
//! sources are unmasked again by the next task-context `read`.
//!
//! The transmit path moves at most one hardware FIFO worth of bytes per
//! interrupt and masks the transmit source once the buffer is empty.

use crate::hal::serial::{UartInterrupts, UartPort};
use crate::hw::hsuart::FIFO_DEPTH;

use super::fifo::ByteFifo;
use super::transport::Transport;

/// Bytes moved to the hardware per transmit interrupt.
pub const TX_CHUNK: usize = FIFO_DEPTH;

/// Sources the handler acknowledges and dispatches.
pub const SERVICED: UartInterrupts = UartInterrupts::all();

/// Top-level handler body: acknowledge, then dispatch per direction.
pub fn service<P: UartPort, T: Transport>(port: &P, transport: &T) {
    let status = port.interrupt_status();

    // Acknowledge first so an event raised while we work is not lost
    port.clear_interrupts(status & SERVICED);

    if status.intersects(UartInterrupts::RECEIVE) {
        transport.on_receive(port);
    }

    if status.contains(UartInterrupts::TX) {
        transport.on_transmit(port);
    }
}

/// Move received bytes from hardware into `fifo`.
///
/// Returns the number of bytes drained. A full buffer masks the receive
/// sources and drains nothing.
pub fn drain_rx<P: UartPort>(port: &P, fifo: &mut ByteFifo) -> usize {
    if fifo.is_full() {
        port.disable_interrupts(UartInterrupts::RECEIVE);
        return 0;
    }

    let mut drained = 0;
    while !fifo.is_full() && !port.rx_empty() {
        fifo.push_byte(port.read_data());
        drained += 1;
    }
    drained
}

/// Move up to [`TX_CHUNK`] bytes from `fifo` into hardware.
///
/// Bytes leave the buffer only once the hardware has room for them. Masks
/// the transmit source when nothing is left to send, re-arms it otherwise.
pub fn fill_tx<P: UartPort>(port: &P, fifo: &mut ByteFifo) -> usize {
    if fifo.is_empty() {
        port.disable_interrupts(UartInterrupts::TX);
        return 0;
    }

    let mut sent = 0;
    while sent < TX_CHUNK && !port.tx_full() {
        match fifo.pop_byte() {
            Some(byte) => port.write_data(byte),
            None => break,
        }
        sent += 1;
    }

    port.enable_interrupts(UartInterrupts::TX);
    sent
}
