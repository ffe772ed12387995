//! Routing of host interface UART signals to package pins.
//!
//! ```text
//! UART0: TX=GP4 RX=GP5
//! UART2: TX=GP0 RX=GP1 RTS=GP2 CTS=GP3
//! UART3: TX=GP6 RX=GP7
//! ```

use crate::hal::gpio::{PinMux, UNSELECTED, select_word};

use super::error::HifError;

/// Pin assignment of one channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Route {
    /// GPIOs handed to the alternate function.
    pub alt_bits: u32,
    /// Select word: TX, RX, RTS, CTS lanes.
    pub select: u32,
}

/// Select word that disconnects every signal.
pub const SELECT_NONE: u32 = select_word([UNSELECTED; 4]);

const fn gpio(pins: &[u8]) -> u32 {
    let mut bits = 0;
    let mut i = 0;
    while i < pins.len() {
        bits |= 1 << pins[i];
        i += 1;
    }
    bits
}

/// Pin assignment for `channel`, if it has one.
pub const fn route(channel: u8) -> Option<Route> {
    match channel {
        0 => Some(Route {
            alt_bits: gpio(&[4, 5]),
            select: select_word([4, 5, UNSELECTED, UNSELECTED]),
        }),
        2 => Some(Route {
            alt_bits: gpio(&[0, 1, 2, 3]),
            select: select_word([0, 1, 2, 3]),
        }),
        3 => Some(Route {
            alt_bits: gpio(&[6, 7]),
            select: select_word([6, 7, UNSELECTED, UNSELECTED]),
        }),
        _ => None,
    }
}

/// Connects and disconnects a channel's pins through the SoC pin mux.
///
/// Holds no state beyond the mux registers themselves.
pub struct PinRouter<P> {
    mux: P,
}

impl<P: PinMux> PinRouter<P> {
    pub const fn new(mux: P) -> Self {
        Self { mux }
    }

    /// Hand the channel's pins to the UART.
    pub fn enable(&mut self, channel: u8) -> Result<(), HifError> {
        let route = route(channel).ok_or(HifError::InvalidParameter)?;

        let alt = self.mux.alt_function();
        self.mux
            .set_alt_function(alt | route.alt_bits)
            .map_err(|e| Self::mux_error(channel, e))?;
        log::debug!("GPIO_ALT0: 0x{:X} -> 0x{:X}", alt, self.mux.alt_function());

        if let Err(e) = self.mux.set_select(channel, route.select) {
            // Give the pins back before failing
            let _ = self.mux.set_alt_function(alt);
            return Err(Self::mux_error(channel, e));
        }
        log::debug!("UIO_SEL_UART{}: 0x{:X}", channel, route.select);

        Ok(())
    }

    /// Return the channel's pins to GPIO use.
    pub fn disable(&mut self, channel: u8) -> Result<(), HifError> {
        let route = route(channel).ok_or(HifError::InvalidParameter)?;

        let alt = self.mux.alt_function();
        self.mux
            .set_alt_function(alt & !route.alt_bits)
            .map_err(|e| Self::mux_error(channel, e))?;
        self.mux
            .set_select(channel, SELECT_NONE)
            .map_err(|e| Self::mux_error(channel, e))?;
        log::debug!("GPIO_ALT0: 0x{:X}, UIO_SEL_UART{} released", self.mux.alt_function(), channel);

        Ok(())
    }

    fn mux_error(channel: u8, error: P::Error) -> HifError {
        log::error!("UART{} pin mux failed: {:?}", channel, error);
        HifError::InvalidParameter
    }
}
