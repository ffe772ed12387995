//! Host interface UART configuration and its validation rules.

use crate::hal::serial::{DataBits, FlowControl, Parity, SerialConfig, StopBits};

use super::error::HifError;

/// Channel number of a closed driver.
pub const CLOSED_CHANNEL: i8 = -1;

/// The only channel wired for RTS/CTS.
pub const HFC_CHANNEL: i8 = 2;

/// Highest baud rate usable without flow control.
///
/// Set at build time through the `HIF_UART_BAUDRATE` environment variable.
pub const NON_HFC_BAUDRATE_MAX: u32 = match option_env!("HIF_UART_BAUDRATE") {
    Some(value) => match u32::from_str_radix(value, 10) {
        Ok(baud) => baud,
        Err(_) => panic!("HIF_UART_BAUDRATE must be a decimal baud rate"),
    },
    None => 115_200,
};

/// Baud rates legal with or without flow control.
pub const BAUDRATES: [u32; 2] = [19_200, 38_400];

/// Baud rates legal only with flow control.
pub const HFC_BAUDRATES: [u32; 12] = [
    57_600, 115_200, 230_400, 380_400, 460_800, 500_000, 576_000, 921_600, 1_000_000, 1_152_000,
    1_500_000, 2_000_000,
];

/// Configuration of the host interface UART.
///
/// Exactly one is active at a time; [`UartConfig::CLOSED`] stands for none.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartConfig {
    pub channel: i8,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub flow_control: FlowControl,
}

impl UartConfig {
    pub const CLOSED: Self = Self {
        channel: CLOSED_CHANNEL,
        baud_rate: 0,
        data_bits: DataBits::Eight,
        stop_bits: StopBits::One,
        parity: Parity::None,
        flow_control: FlowControl::None,
    };

    /// 8 data bits, no parity, 1 stop bit, no flow control.
    pub const fn new_8n1(channel: i8, baud_rate: u32) -> Self {
        Self {
            channel,
            baud_rate,
            ..Self::CLOSED
        }
    }

    pub const fn with_flow_control(self) -> Self {
        Self {
            flow_control: FlowControl::RtsCts,
            ..self
        }
    }

    pub const fn is_closed(&self) -> bool {
        self.channel < 0
    }

    /// Channel as a hardware index, if it names one.
    pub fn hw_channel(&self) -> Option<u8> {
        u8::try_from(self.channel).ok()
    }

    /// Line settings to program into the peripheral.
    pub const fn serial(&self) -> SerialConfig {
        SerialConfig {
            baud_rate: self.baud_rate,
            data_bits: self.data_bits,
            parity: self.parity,
            stop_bits: self.stop_bits,
            flow_control: self.flow_control,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Whether `channel` is a host interface UART on this build.
pub fn channel_is_valid(channel: i8) -> bool {
    cfg_if::cfg_if! {
        if #[cfg(feature = "ch2-only")] {
            channel == HFC_CHANNEL
        } else {
            matches!(channel, 0 | 2 | 3)
        }
    }
}

/// Whether `baud_rate` is legal given the flow control setting.
pub fn baud_flow_combination_is_valid(baud_rate: u32, flow_control: FlowControl) -> bool {
    BAUDRATES.contains(&baud_rate)
        || (flow_control.is_enabled() && HFC_BAUDRATES.contains(&baud_rate))
}

/// Channel-specific rules checked before a configuration is programmed.
///
/// Flow control is reserved for [`HFC_CHANNEL`]; without flow control no
/// channel may exceed [`NON_HFC_BAUDRATE_MAX`].
pub fn check_enable(config: &UartConfig) -> Result<(), HifError> {
    if !channel_is_valid(config.channel) {
        return Err(HifError::InvalidParameter);
    }

    if config.channel != HFC_CHANNEL && config.flow_control.is_enabled() {
        log::info!(
            "UART Enable: Channel {} can not use hardware flow control.",
            config.channel
        );
        return Err(HifError::InvalidParameter);
    }

    if !config.flow_control.is_enabled() && config.baud_rate > NON_HFC_BAUDRATE_MAX {
        log::info!(
            "UART Enable: Channel {} can not use baudrate greater than {}bps.",
            config.channel,
            NON_HFC_BAUDRATE_MAX
        );
        return Err(HifError::InvalidParameter);
    }

    Ok(())
}

/// Every check `open` and `change` apply before touching hardware.
pub fn validate(config: &UartConfig) -> Result<(), HifError> {
    if !channel_is_valid(config.channel) {
        log::info!("UART: invalid channel={}", config.channel);
        return Err(HifError::InvalidParameter);
    }

    if !baud_flow_combination_is_valid(config.baud_rate, config.flow_control) {
        log::info!(
            "UART: invalid baudrate={} hfc={}",
            config.baud_rate,
            config.flow_control
        );
        return Err(HifError::InvalidParameter);
    }

    check_enable(config)
}
