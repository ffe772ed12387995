//! Register-level stand-ins for the UART, pin mux and interrupt controller.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::vec::Vec;

use spin::Mutex;

use crate::hal::gpio::{PinMux, PinMuxError};
use crate::hal::interrupt::{
    HandlerTable, InterruptController, InterruptHandler, IrqError, IrqNumber,
};
use crate::hal::serial::{
    FifoLevel, SerialConfig, SerialError, UartBank, UartInterrupts, UartPort,
};
use crate::hw::hsuart::FIFO_DEPTH;

struct PortState {
    imsc: UartInterrupts,
    cleared: UartInterrupts,
    rx: VecDeque<u8>,
    always_ready: Option<u8>,
    bytes_read: usize,
    tx: VecDeque<u8>,
    tx_capacity: usize,
    wire: Vec<u8>,
    loopback: bool,
    config: Option<SerialConfig>,
    fifo_levels: Option<(FifoLevel, FifoLevel)>,
    reject_baud: Option<u32>,
}

/// One UART whose FIFOs live in memory. Clones share the same registers.
#[derive(Clone)]
pub struct MockPort(Arc<Mutex<PortState>>);

impl MockPort {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(PortState {
            imsc: UartInterrupts::empty(),
            cleared: UartInterrupts::empty(),
            rx: VecDeque::new(),
            always_ready: None,
            bytes_read: 0,
            tx: VecDeque::new(),
            tx_capacity: FIFO_DEPTH,
            wire: Vec::new(),
            loopback: false,
            config: None,
            fifo_levels: None,
            reject_baud: None,
        })))
    }

    /// Queue bytes as if they arrived on the wire.
    pub fn inject_rx(&self, data: &[u8]) {
        self.0.lock().rx.extend(data.iter().copied());
    }

    /// Report `byte` as ready forever, regardless of how much is read.
    pub fn set_always_ready(&self, byte: Option<u8>) {
        self.0.lock().always_ready = byte;
    }

    pub fn bytes_read(&self) -> usize {
        self.0.lock().bytes_read
    }

    pub fn set_tx_capacity(&self, capacity: usize) {
        self.0.lock().tx_capacity = capacity;
    }

    /// Bytes sitting in the transmit FIFO.
    pub fn hw_tx(&self) -> Vec<u8> {
        self.0.lock().tx.iter().copied().collect()
    }

    /// Empty the transmit FIFO onto the wire (and back into the receive
    /// FIFO when looped back).
    pub fn shift_out(&self) {
        let mut state = self.0.lock();
        let bytes: Vec<u8> = state.tx.drain(..).collect();
        if state.loopback {
            state.rx.extend(bytes.iter().copied());
        }
        state.wire.extend(bytes);
    }

    /// Everything transmitted so far.
    pub fn wire(&self) -> Vec<u8> {
        self.0.lock().wire.clone()
    }

    pub fn set_loopback(&self, on: bool) {
        self.0.lock().loopback = on;
    }

    /// Make `configure` refuse this baud rate.
    pub fn reject_baud(&self, baud: Option<u32>) {
        self.0.lock().reject_baud = baud;
    }

    pub fn config(&self) -> Option<SerialConfig> {
        self.0.lock().config
    }

    pub fn fifo_levels(&self) -> Option<(FifoLevel, FifoLevel)> {
        self.0.lock().fifo_levels
    }

    pub fn cleared(&self) -> UartInterrupts {
        self.0.lock().cleared
    }

    fn raw_status(state: &PortState) -> UartInterrupts {
        let mut raw = UartInterrupts::empty();
        if !state.rx.is_empty() || state.always_ready.is_some() {
            raw |= UartInterrupts::RX | UartInterrupts::RX_TIMEOUT;
        }
        if state.tx.len() <= state.tx_capacity / 8 {
            raw |= UartInterrupts::TX;
        }
        raw
    }
}

impl UartPort for MockPort {
    fn configure(&self, config: &SerialConfig) -> Result<(), SerialError> {
        let mut state = self.0.lock();
        if state.reject_baud == Some(config.baud_rate) {
            return Err(SerialError::InvalidConfig);
        }
        state.config = Some(*config);
        state.imsc = UartInterrupts::empty();
        Ok(())
    }

    fn set_fifo_levels(&self, tx: FifoLevel, rx: FifoLevel) {
        self.0.lock().fifo_levels = Some((tx, rx));
    }

    fn shutdown(&self) {
        let mut state = self.0.lock();
        state.config = None;
        state.imsc = UartInterrupts::empty();
    }

    fn enable_interrupts(&self, sources: UartInterrupts) {
        self.0.lock().imsc |= sources;
    }

    fn disable_interrupts(&self, sources: UartInterrupts) {
        self.0.lock().imsc &= !sources;
    }

    fn enabled_interrupts(&self) -> UartInterrupts {
        self.0.lock().imsc
    }

    fn interrupt_status(&self) -> UartInterrupts {
        let state = self.0.lock();
        Self::raw_status(&state) & state.imsc
    }

    fn clear_interrupts(&self, sources: UartInterrupts) {
        self.0.lock().cleared |= sources;
    }

    fn rx_empty(&self) -> bool {
        let state = self.0.lock();
        state.rx.is_empty() && state.always_ready.is_none()
    }

    fn read_data(&self) -> u8 {
        let mut state = self.0.lock();
        state.bytes_read += 1;
        match state.always_ready {
            Some(byte) => byte,
            None => state.rx.pop_front().unwrap_or(0),
        }
    }

    fn tx_full(&self) -> bool {
        let state = self.0.lock();
        state.tx.len() >= state.tx_capacity
    }

    fn tx_empty(&self) -> bool {
        self.0.lock().tx.is_empty()
    }

    fn write_data(&self, byte: u8) {
        self.0.lock().tx.push_back(byte);
    }
}

pub const VECTOR_BASE: IrqNumber = 20;

/// Four UARTs, channel `n` on vector `VECTOR_BASE + n`.
#[derive(Clone)]
pub struct MockBank {
    ports: Vec<MockPort>,
}

impl MockBank {
    pub fn new() -> Self {
        Self {
            ports: (0..4).map(|_| MockPort::new()).collect(),
        }
    }

    pub fn channel(&self, channel: u8) -> MockPort {
        self.ports[channel as usize].clone()
    }
}

impl UartBank for MockBank {
    type Port = MockPort;

    fn port(&self, channel: u8) -> Option<MockPort> {
        self.ports.get(channel as usize).cloned()
    }

    fn vector(&self, channel: u8) -> Option<IrqNumber> {
        (usize::from(channel) < self.ports.len()).then(|| VECTOR_BASE + IrqNumber::from(channel))
    }
}

struct MuxState {
    alt: u32,
    select: [u32; 4],
    fail_select: Option<u8>,
}

/// Alternate-function and select registers in memory.
#[derive(Clone)]
pub struct MockMux(Arc<Mutex<MuxState>>);

impl MockMux {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(MuxState {
            alt: 0,
            select: [0; 4],
            fail_select: None,
        })))
    }

    pub fn set_alt(&self, word: u32) {
        self.0.lock().alt = word;
    }

    /// Make writes to `slot`'s select word fail.
    pub fn fail_select(&self, slot: u8) {
        self.0.lock().fail_select = Some(slot);
    }
}

impl PinMux for MockMux {
    type Error = PinMuxError;

    fn alt_function(&self) -> u32 {
        self.0.lock().alt
    }

    fn set_alt_function(&mut self, word: u32) -> Result<(), PinMuxError> {
        self.0.lock().alt = word;
        Ok(())
    }

    fn select(&self, slot: u8) -> Result<u32, PinMuxError> {
        self.0
            .lock()
            .select
            .get(slot as usize)
            .copied()
            .ok_or(PinMuxError::InvalidSlot)
    }

    fn set_select(&mut self, slot: u8, word: u32) -> Result<(), PinMuxError> {
        let mut state = self.0.lock();
        if state.fail_select == Some(slot) {
            return Err(PinMuxError::InvalidSlot);
        }
        let entry = state
            .select
            .get_mut(slot as usize)
            .ok_or(PinMuxError::InvalidSlot)?;
        *entry = word;
        Ok(())
    }
}

/// Interrupt controller with its own handler table.
#[derive(Clone)]
pub struct MockIntc {
    table: &'static HandlerTable,
    enabled: Arc<Mutex<BTreeSet<IrqNumber>>>,
}

impl MockIntc {
    pub fn new() -> Self {
        Self {
            table: Box::leak(Box::new(HandlerTable::new())),
            enabled: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Raise `irq` if it is unmasked.
    pub fn fire(&self, irq: IrqNumber) {
        if self.enabled.lock().contains(&irq) {
            self.table.dispatch(irq);
        }
    }

    pub fn is_enabled(&self, irq: IrqNumber) -> bool {
        self.enabled.lock().contains(&irq)
    }

    pub fn is_registered(&self, irq: IrqNumber) -> bool {
        self.table.is_registered(irq)
    }
}

impl InterruptController for MockIntc {
    type Error = IrqError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        self.enabled.lock().insert(irq);
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), IrqError> {
        self.enabled.lock().remove(&irq);
        Ok(())
    }

    fn is_pending(&self, _irq: IrqNumber) -> Result<bool, IrqError> {
        Ok(false)
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
