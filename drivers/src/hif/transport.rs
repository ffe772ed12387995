//! Byte transports between callers and the UART hardware.
//!
//! Two implementations share one interface and are chosen when the driver
//! is constructed:
//!
//! - [`BufferedInterruptTransport`]: receive and transmit buffers filled and
//!   drained by the interrupt handler. A direction given size 0 falls back
//!   to direct hardware access.
//! - [`DirectPollingTransport`]: no buffers, no interrupts; every call
//!   touches the hardware FIFOs directly.

use common::sync::IrqSpinLock;
use common::sync::irq::IrqControl;

use crate::hal::serial::{UartInterrupts, UartPort};

use super::error::HifError;
use super::fifo::ByteFifo;
use super::isr::{self, TX_CHUNK};

/// Interface shared by the host interface transports.
///
/// `attach`/`detach` run in task context. `read`/`write` run in task
/// context and never block. The `on_*` hooks run in interrupt context.
pub trait Transport {
    /// Create the transfer buffers for a new session.
    fn attach(&self, rx_size: usize, tx_size: usize) -> Result<(), HifError>;

    /// Release the transfer buffers.
    fn detach(&self);

    /// Effective (rx, tx) buffer sizes; 0 for an unbuffered direction.
    fn buffer_sizes(&self) -> (usize, usize);

    /// Sources to unmask once the peripheral is (re)programmed.
    ///
    /// Includes transmit while bytes are still queued, so a reprogrammed
    /// peripheral picks up where the previous configuration stopped.
    fn armed_interrupts(&self) -> UartInterrupts;

    fn read<P: UartPort>(&self, port: &P, buf: &mut [u8]) -> usize;

    fn write<P: UartPort>(&self, port: &P, buf: &[u8]) -> usize;

    /// Receive data ready or receive timeout.
    fn on_receive<P: UartPort>(&self, port: &P);

    /// Transmit FIFO below its trigger level.
    fn on_transmit<P: UartPort>(&self, port: &P);
}

/// Read while the hardware has data, up to `buf.len()` bytes.
pub fn read_direct<P: UartPort>(port: &P, buf: &mut [u8]) -> usize {
    let mut count = 0;
    for slot in buf.iter_mut() {
        match port.try_read_byte() {
            Ok(byte) => *slot = byte,
            Err(_) => break,
        }
        count += 1;
    }
    count
}

/// Write up to one FIFO worth of bytes, only into an empty transmit FIFO.
pub fn write_direct<P: UartPort>(port: &P, buf: &[u8]) -> usize {
    if !port.tx_empty() {
        return 0;
    }

    let mut count = 0;
    for &byte in buf.iter().take(TX_CHUNK) {
        if port.try_write_byte(byte).is_err() {
            break;
        }
        count += 1;
    }
    count
}

/// State of one direction of a [`BufferedInterruptTransport`].
enum Lane {
    /// No session; the port must not be touched.
    Detached,
    /// Session without a buffer for this direction.
    Direct,
    Buffered(ByteFifo),
}

impl Lane {
    fn create(size: usize) -> Result<Self, HifError> {
        match size {
            0 => Ok(Lane::Direct),
            size => ByteFifo::new(size).map(Lane::Buffered),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Lane::Buffered(fifo) => fifo.capacity(),
            _ => 0,
        }
    }
}

/// Interrupt-driven transport with a bounded buffer per direction.
///
/// Each direction lives behind its own [`IrqSpinLock`]. Every decision to
/// unmask a peripheral source is taken while that lock is held, so it
/// cannot race a concurrent `detach`.
pub struct BufferedInterruptTransport<I: IrqControl> {
    rx: IrqSpinLock<Lane, I>,
    tx: IrqSpinLock<Lane, I>,
    rx_notify: Option<fn()>,
}

impl<I: IrqControl> BufferedInterruptTransport<I> {
    pub const fn new() -> Self {
        Self {
            rx: IrqSpinLock::new(Lane::Detached),
            tx: IrqSpinLock::new(Lane::Detached),
            rx_notify: None,
        }
    }

    /// Call `notify` from interrupt context after each receive service, to
    /// wake a consumer waiting for data.
    pub const fn with_rx_notify(mut self, notify: fn()) -> Self {
        self.rx_notify = Some(notify);
        self
    }
}

impl<I: IrqControl> Default for BufferedInterruptTransport<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IrqControl> Transport for BufferedInterruptTransport<I> {
    fn attach(&self, rx_size: usize, tx_size: usize) -> Result<(), HifError> {
        if rx_size == 0 && tx_size == 0 {
            log::error!("UART FIFO: no buffer requested");
            return Err(HifError::InvalidParameter);
        }

        // Both or neither
        let (rx, tx) = match (Lane::create(rx_size), Lane::create(tx_size)) {
            (Ok(rx), Ok(tx)) => (rx, tx),
            _ => {
                log::error!("UART FIFO: create failed, rx={} tx={}", rx_size, tx_size);
                return Err(HifError::ResourceExhausted);
            }
        };

        *self.rx.lock() = rx;
        *self.tx.lock() = tx;

        log::info!("UART FIFO: rx={}, tx={}", rx_size, tx_size);
        Ok(())
    }

    fn detach(&self) {
        *self.rx.lock() = Lane::Detached;
        *self.tx.lock() = Lane::Detached;
    }

    fn buffer_sizes(&self) -> (usize, usize) {
        (self.rx.lock().capacity(), self.tx.lock().capacity())
    }

    fn armed_interrupts(&self) -> UartInterrupts {
        let mut armed = UartInterrupts::empty();
        if let Lane::Buffered(_) = &*self.rx.lock() {
            armed |= UartInterrupts::RECEIVE;
        }
        if matches!(&*self.tx.lock(), Lane::Buffered(fifo) if !fifo.is_empty()) {
            armed |= UartInterrupts::TX;
        }
        armed
    }

    fn read<P: UartPort>(&self, port: &P, buf: &mut [u8]) -> usize {
        let mut rx = self.rx.lock();
        match &mut *rx {
            Lane::Detached => 0,
            Lane::Direct => read_direct(port, buf),
            Lane::Buffered(fifo) => {
                port.disable_interrupts(UartInterrupts::RECEIVE);
                let count = fifo.pop(buf);
                // Also resumes a receive path masked for backpressure
                port.enable_interrupts(UartInterrupts::RECEIVE);
                count
            }
        }
    }

    fn write<P: UartPort>(&self, port: &P, buf: &[u8]) -> usize {
        let mut tx = self.tx.lock();
        match &mut *tx {
            Lane::Detached => 0,
            Lane::Direct => write_direct(port, buf),
            Lane::Buffered(fifo) => {
                let count = fifo.push(buf);
                // TX stays armed while anything is queued
                if !fifo.is_empty() {
                    port.enable_interrupts(UartInterrupts::TX);
                }
                count
            }
        }
    }

    fn on_receive<P: UartPort>(&self, port: &P) {
        // Contended: leave the data in hardware for the next interrupt
        let Some(mut rx) = self.rx.try_lock() else {
            return;
        };

        match &mut *rx {
            Lane::Buffered(fifo) => {
                isr::drain_rx(port, fifo);
            }
            _ => port.disable_interrupts(UartInterrupts::RECEIVE),
        }
        drop(rx);

        if let Some(notify) = self.rx_notify {
            notify();
        }
    }

    fn on_transmit<P: UartPort>(&self, port: &P) {
        let Some(mut tx) = self.tx.try_lock() else {
            return;
        };

        match &mut *tx {
            Lane::Buffered(fifo) => {
                isr::fill_tx(port, fifo);
            }
            _ => port.disable_interrupts(UartInterrupts::TX),
        }
    }
}

/// Unbuffered transport: callers poll the hardware FIFOs directly.
#[derive(Debug, Default, Copy, Clone)]
pub struct DirectPollingTransport;

impl Transport for DirectPollingTransport {
    fn attach(&self, _rx_size: usize, _tx_size: usize) -> Result<(), HifError> {
        log::info!("UART FIFO: rx=0, tx=0");
        Ok(())
    }

    fn detach(&self) {}

    fn buffer_sizes(&self) -> (usize, usize) {
        (0, 0)
    }

    fn armed_interrupts(&self) -> UartInterrupts {
        UartInterrupts::empty()
    }

    fn read<P: UartPort>(&self, port: &P, buf: &mut [u8]) -> usize {
        read_direct(port, buf)
    }

    fn write<P: UartPort>(&self, port: &P, buf: &[u8]) -> usize {
        write_direct(port, buf)
    }

    fn on_receive<P: UartPort>(&self, port: &P) {
        port.disable_interrupts(UartInterrupts::RECEIVE);
    }

    fn on_transmit<P: UartPort>(&self, port: &P) {
        port.disable_interrupts(UartInterrupts::TX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hif::mock::MockPort;
    use common::sync::irq::NoIrq;

    #[test]
    fn attach_requires_a_buffer_and_is_all_or_nothing() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        assert_eq!(transport.attach(0, 0), Err(HifError::InvalidParameter));

        assert_eq!(
            transport.attach(64, usize::MAX),
            Err(HifError::ResourceExhausted)
        );
        assert_eq!(transport.buffer_sizes(), (0, 0));

        transport.attach(64, 0).unwrap();
        assert_eq!(transport.buffer_sizes(), (64, 0));
        assert_eq!(transport.armed_interrupts(), UartInterrupts::RECEIVE);

        transport.detach();
        assert_eq!(transport.buffer_sizes(), (0, 0));
        assert_eq!(transport.armed_interrupts(), UartInterrupts::empty());
    }

    #[test]
    fn unbuffered_transmit_polls_hardware() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        transport.attach(32, 0).unwrap();
        let port = MockPort::new();

        let data = [0xAAu8; 40];
        assert_eq!(transport.write(&port, &data), TX_CHUNK);
        assert!(!port.enabled_interrupts().contains(UartInterrupts::TX));

        // Hardware still holds the previous chunk
        assert_eq!(transport.write(&port, &data), 0);
        port.shift_out();
        assert_eq!(transport.write(&port, &data[..3]), 3);
    }

    #[test]
    fn buffered_write_arms_transmit() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        transport.attach(16, 8).unwrap();
        let port = MockPort::new();

        assert_eq!(transport.write(&port, b"0123456789"), 8);
        assert!(port.enabled_interrupts().contains(UartInterrupts::TX));
        assert_eq!(transport.write(&port, b"x"), 0);
    }

    #[test]
    fn queued_transmit_is_rearmed() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        transport.attach(8, 4).unwrap();
        let port = MockPort::new();

        assert_eq!(transport.armed_interrupts(), UartInterrupts::RECEIVE);
        assert_eq!(transport.write(&port, b"abcd"), 4);
        assert_eq!(
            transport.armed_interrupts(),
            UartInterrupts::RECEIVE | UartInterrupts::TX
        );

        // Reprogramming the peripheral wipes its mask
        port.disable_interrupts(UartInterrupts::all());
        assert_eq!(transport.write(&port, b"e"), 0);
        assert!(port.enabled_interrupts().contains(UartInterrupts::TX));

        transport.on_transmit(&port);
        assert_eq!(port.hw_tx(), b"abcd");
        transport.on_transmit(&port);
        assert_eq!(transport.armed_interrupts(), UartInterrupts::RECEIVE);
    }

    #[test]
    fn detached_transport_leaves_port_alone() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        transport.attach(8, 8).unwrap();
        transport.detach();
        let port = MockPort::new();
        port.inject_rx(b"stale");

        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&port, &mut buf), 0);
        assert_eq!(transport.write(&port, b"late"), 0);
        assert_eq!(port.enabled_interrupts(), UartInterrupts::empty());
        assert!(port.hw_tx().is_empty());
        assert_eq!(port.bytes_read(), 0);
    }

    #[test]
    fn read_unmasks_receive_after_backpressure() {
        let transport = BufferedInterruptTransport::<NoIrq>::new();
        transport.attach(4, 4).unwrap();
        let port = MockPort::new();
        port.enable_interrupts(UartInterrupts::RECEIVE);
        port.inject_rx(b"abcdef");

        transport.on_receive(&port);
        transport.on_receive(&port);
        assert!(!port.enabled_interrupts().intersects(UartInterrupts::RECEIVE));

        let mut buf = [0u8; 2];
        assert_eq!(transport.read(&port, &mut buf), 2);
        assert_eq!(&buf, b"ab");
        assert!(port.enabled_interrupts().contains(UartInterrupts::RECEIVE));
    }

    #[test]
    fn receive_notifies_consumer() {
        use core::sync::atomic::{AtomicUsize, Ordering};
        static WAKES: AtomicUsize = AtomicUsize::new(0);

        let transport =
            BufferedInterruptTransport::<NoIrq>::new().with_rx_notify(|| {
                WAKES.fetch_add(1, Ordering::SeqCst);
            });
        transport.attach(8, 8).unwrap();
        let port = MockPort::new();
        port.inject_rx(b"z");

        transport.on_receive(&port);
        assert_eq!(WAKES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn direct_transport_never_buffers() {
        let transport = DirectPollingTransport;
        transport.attach(256, 256).unwrap();
        assert_eq!(transport.buffer_sizes(), (0, 0));

        let port = MockPort::new();
        port.inject_rx(b"ok");
        let mut buf = [0u8; 8];
        assert_eq!(transport.read(&port, &mut buf), 2);
        assert_eq!(transport.read(&port, &mut buf), 0);

        assert_eq!(transport.write(&port, b"hi"), 2);
        port.shift_out();
        assert_eq!(port.wire(), b"hi");
    }
}
