//! GPIO pin multiplexing Hardware Abstraction Layer.
//!
//! Peripheral signals reach package pins through two layers of muxing:
//! an alternate-function enable bit per GPIO, and a per-peripheral select
//! word that names which GPIO carries each of the peripheral's signals.

/// Pin multiplexer trait.
///
/// The select word packs one GPIO number per byte lane; a lane value of
/// [`UNSELECTED`] leaves that signal unconnected.
pub trait PinMux {
    /// Error type for mux operations.
    type Error: core::fmt::Debug;

    /// Read the alternate-function enable word (one bit per GPIO).
    fn alt_function(&self) -> u32;

    /// Write the alternate-function enable word.
    fn set_alt_function(&mut self, word: u32) -> Result<(), Self::Error>;

    /// Read the signal select word of a peripheral slot.
    fn select(&self, slot: u8) -> Result<u32, Self::Error>;

    /// Write the signal select word of a peripheral slot.
    fn set_select(&mut self, slot: u8, word: u32) -> Result<(), Self::Error>;
}

/// Lane value that disconnects a peripheral signal.
pub const UNSELECTED: u8 = 0xff;

/// Pack four per-signal GPIO numbers into a select word, lowest lane first.
pub const fn select_word(lanes: [u8; 4]) -> u32 {
    u32::from_le_bytes(lanes)
}

/// Pin mux errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinMuxError {
    /// The peripheral slot does not exist on this SoC.
    InvalidSlot,
}
