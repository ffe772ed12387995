//! Host interface UART driver.
//!
//! [`HifUart`] owns one session at a time: a validated [`UartConfig`], the
//! transport's buffers, the channel's pins and its interrupt vector. All
//! state lives in the instance; nothing is global.
//!
//! # Lifecycle
//!
//! ```text
//! closed --open--> open --change--> open
//!    ^               |     \--(rollback failed)--> closed (RestoreFailed)
//!    +-----close-----+
//! ```
//!
//! Every transition masks the peripheral's interrupts before touching the
//! configuration, so the interrupt handler never sees a half-applied one.

use core::sync::atomic::{AtomicI8, Ordering};

use common::sync::SpinLock;

use crate::hal::gpio::PinMux;
use crate::hal::interrupt::{InterruptController, InterruptHandler, IrqNumber};
use crate::hal::serial::{FifoLevel, UartBank, UartInterrupts, UartPort};

use super::config::{self, CLOSED_CHANNEL, UartConfig};
use super::error::HifError;
use super::isr;
use super::pins::PinRouter;
use super::transport::Transport;

/// Transmit FIFO interrupt trigger level.
pub const TX_FIFO_LEVEL: FifoLevel = FifoLevel::OneEighth;

/// Receive FIFO interrupt trigger level.
pub const RX_FIFO_LEVEL: FifoLevel = FifoLevel::SevenEighths;

/// Outcome of [`HifUart::close`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseStatus {
    /// An open session was shut down.
    Closed,
    /// There was nothing to close.
    NotOpen,
}

/// Host interface UART driver instance.
///
/// Lifecycle operations (`open`, `change`) take `&'static self` because the
/// instance registers itself as the handler of its interrupt vector.
pub struct HifUart<T, B, P, C> {
    transport: T,
    bank: B,
    pins: SpinLock<PinRouter<P>>,
    intc: SpinLock<C>,
    config: SpinLock<UartConfig>,
    /// Held by every operation that touches the session, so data transfer
    /// never sees a port that open/close/change is tearing down.
    lifecycle: SpinLock<()>,
    /// Channel the interrupt handler services, or `CLOSED_CHANNEL`.
    active: AtomicI8,
}

impl<T, B, P, C> HifUart<T, B, P, C>
where
    T: Transport + Sync + 'static,
    B: UartBank + Sync + 'static,
    P: PinMux + Send + 'static,
    C: InterruptController + Send + 'static,
{
    pub const fn new(transport: T, bank: B, pin_mux: P, intc: C) -> Self {
        Self {
            transport,
            bank,
            pins: SpinLock::new(PinRouter::new(pin_mux)),
            intc: SpinLock::new(intc),
            config: SpinLock::new(UartConfig::CLOSED),
            lifecycle: SpinLock::new(()),
            active: AtomicI8::new(CLOSED_CHANNEL),
        }
    }

    /// Copy of the active configuration; [`UartConfig::CLOSED`] when closed.
    pub fn get_info(&self) -> UartConfig {
        *self.config.lock()
    }

    pub fn is_open(&self) -> bool {
        !self.get_info().is_closed()
    }

    /// Effective (rx, tx) buffer sizes of the current session.
    pub fn buffer_sizes(&self) -> (usize, usize) {
        self.transport.buffer_sizes()
    }

    /// Start a session.
    ///
    /// A buffer size of 0 leaves that direction unbuffered. On failure
    /// nothing of the attempt survives: no buffers, no hardware
    /// programming, no pin routing.
    pub fn open(
        &'static self,
        config: &UartConfig,
        rx_size: usize,
        tx_size: usize,
    ) -> Result<(), HifError> {
        let _lifecycle = self.lifecycle.lock();

        log::info!(
            "UART Open: channel={} baudrate={} hfc={}",
            config.channel,
            config.baud_rate,
            config.flow_control
        );

        let result = self.try_open(config, rx_size, tx_size);
        match result {
            Ok(()) => log::info!("UART Open: success"),
            Err(e) => log::info!("UART Open: fail ({})", e),
        }
        result
    }

    fn try_open(
        &'static self,
        config: &UartConfig,
        rx_size: usize,
        tx_size: usize,
    ) -> Result<(), HifError> {
        if self.is_open() {
            return Err(HifError::AlreadyOpen);
        }

        config::validate(config)?;

        self.transport.attach(rx_size, tx_size)?;

        self.enable(config).inspect_err(|_| self.transport.detach())
    }

    /// End the session, if any.
    pub fn close(&self) -> CloseStatus {
        let _lifecycle = self.lifecycle.lock();

        if !self.is_open() {
            log::info!("UART Close: no open");
            return CloseStatus::NotOpen;
        }

        self.disable();
        self.transport.detach();

        log::info!("UART Close: success");
        CloseStatus::Closed
    }

    /// Reconfigure the open session.
    ///
    /// `new` is validated exactly like `open`; an invalid request leaves
    /// the session untouched. If programming `new` fails the previous
    /// configuration is restored; if that fails too the session is closed
    /// and `RestoreFailed` is returned.
    pub fn change(&'static self, new: &UartConfig) -> Result<(), HifError> {
        let _lifecycle = self.lifecycle.lock();

        let old = self.get_info();
        if old.is_closed() {
            log::info!("UART Change: no open");
            return Err(HifError::NotOpen);
        }

        if let Err(e) = config::validate(new) {
            log::info!("UART Change: fail");
            return Err(e);
        }

        log::info!("UART Change:");
        log::info!(" - channel: {}->{}", old.channel, new.channel);
        log::info!(" - baudrate: {}->{}", old.baud_rate, new.baud_rate);
        log::info!(" - data bits: {}->{}", old.data_bits.bits(), new.data_bits.bits());
        log::info!(" - stop bits: {}->{}", old.stop_bits.count(), new.stop_bits.count());
        log::info!(" - parity: {}->{}", old.parity, new.parity);
        log::info!(" - hfc: {}->{}", old.flow_control, new.flow_control);

        self.disable();

        let Err(e) = self.enable(new) else {
            log::info!("UART Change: success");
            return Ok(());
        };

        if self.enable(&old).is_ok() {
            log::info!("UART Change: fail, previous configuration restored");
            return Err(e);
        }

        log::error!(
            "UART Change: fail, channel {} could not be restored and is disabled",
            old.channel
        );
        self.transport.detach();
        Err(HifError::RestoreFailed)
    }

    /// Read up to `buf.len()` received bytes without blocking.
    ///
    /// Returns 0 when closed or when nothing has arrived.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let _session = self.lifecycle.lock();
        match self.active_port() {
            Some(port) => self.transport.read(&port, buf),
            None => 0,
        }
    }

    /// Queue up to `buf.len()` bytes for transmission without blocking.
    ///
    /// Returns the number accepted; 0 when closed or out of room.
    pub fn write(&self, buf: &[u8]) -> usize {
        let _session = self.lifecycle.lock();
        match self.active_port() {
            Some(port) => self.transport.write(&port, buf),
            None => 0,
        }
    }

    /// Read one byte, `None` if nothing is ready.
    pub fn getc(&self) -> Result<Option<u8>, HifError> {
        let _session = self.lifecycle.lock();
        let port = self.active_port().ok_or(HifError::NotOpen)?;
        let mut byte = [0u8];
        Ok((self.transport.read(&port, &mut byte) == 1).then_some(byte[0]))
    }

    /// Write one byte; `false` if there was no room for it.
    pub fn putc(&self, byte: u8) -> Result<bool, HifError> {
        let _session = self.lifecycle.lock();
        let port = self.active_port().ok_or(HifError::NotOpen)?;
        Ok(self.transport.write(&port, &[byte]) == 1)
    }

    /// Interrupt handler body.
    pub fn on_interrupt(&self) {
        if let Some(port) = self.active_port() {
            isr::service(&port, &self.transport);
        }
    }

    fn active_port(&self) -> Option<B::Port> {
        let channel = u8::try_from(self.active.load(Ordering::Acquire)).ok()?;
        self.bank.port(channel)
    }

    /// Program the peripheral, hook its interrupt and route its pins, then
    /// commit `config`. Undoes its own steps on failure.
    fn enable(&'static self, config: &UartConfig) -> Result<(), HifError> {
        config::check_enable(config)?;

        let channel = config.hw_channel().ok_or(HifError::InvalidParameter)?;
        let (Some(port), Some(vector)) = (self.bank.port(channel), self.bank.vector(channel))
        else {
            return Err(HifError::InvalidParameter);
        };

        log::info!(
            "UART Enable: channel={} baudrate={} data={} stop={} parity={} hfc={}",
            config.channel,
            config.baud_rate,
            config.data_bits.bits(),
            config.stop_bits.count(),
            config.parity,
            config.flow_control
        );

        port.configure(&config.serial())?;
        port.set_fifo_levels(TX_FIFO_LEVEL, RX_FIFO_LEVEL);
        port.clear_interrupts(UartInterrupts::all());

        if let Err(e) = self.attach_irq(&port, config.channel, vector) {
            port.shutdown();
            return Err(e);
        }

        if let Err(e) = self.pins.lock().enable(channel) {
            self.detach_irq(&port, vector);
            port.shutdown();
            return Err(e);
        }

        *self.config.lock() = *config;
        Ok(())
    }

    /// Undo `enable` for the committed configuration.
    fn disable(&self) {
        let config = self.get_info();
        let Some(channel) = config.hw_channel() else {
            return;
        };

        log::info!("UART Disable: channel={}", channel);

        if let Err(e) = self.pins.lock().disable(channel) {
            log::warn!("UART Disable: pins of channel {} not released ({})", channel, e);
        }

        if let (Some(port), Some(vector)) = (self.bank.port(channel), self.bank.vector(channel)) {
            self.detach_irq(&port, vector);
        }

        *self.config.lock() = UartConfig::CLOSED;
    }

    fn attach_irq(
        &'static self,
        port: &B::Port,
        channel: i8,
        vector: IrqNumber,
    ) -> Result<(), HifError> {
        let mut intc = self.intc.lock();

        intc.register(vector, self).map_err(|e| Self::irq_error(vector, e))?;
        self.active.store(channel, Ordering::Release);

        if let Err(e) = intc.enable(vector) {
            self.active.store(CLOSED_CHANNEL, Ordering::Release);
            let _ = intc.unregister(vector);
            return Err(Self::irq_error(vector, e));
        }

        port.enable_interrupts(self.transport.armed_interrupts());
        Ok(())
    }

    fn detach_irq(&self, port: &B::Port, vector: IrqNumber) {
        port.disable_interrupts(UartInterrupts::all());
        port.clear_interrupts(UartInterrupts::all());

        self.active.store(CLOSED_CHANNEL, Ordering::Release);

        let mut intc = self.intc.lock();
        let _ = intc.disable(vector);
        let _ = intc.unregister(vector);
    }

    fn irq_error(vector: IrqNumber, error: C::Error) -> HifError {
        log::error!("UART: interrupt vector {} unavailable: {:?}", vector, error);
        HifError::InvalidParameter
    }
}

impl<T, B, P, C> InterruptHandler for HifUart<T, B, P, C>
where
    T: Transport + Sync + 'static,
    B: UartBank + Sync + 'static,
    P: PinMux + Send + 'static,
    C: InterruptController + Send + 'static,
{
    fn handle(&self, _irq: IrqNumber) {
        self.on_interrupt();
    }
}
