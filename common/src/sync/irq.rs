use core::fmt::Debug;

/// Architecture-specific interrupt masking interface.
///
/// Implemented by the architecture layer.
pub trait IrqControl {
    /// Saved interrupt state
    type State: Copy + Debug;

    /// Disable interrupts and return the previous state.
    fn disable() -> Self::State;

    /// Restore interrupts to a previous state.
    fn restore(state: Self::State);
}

/// Interrupt control for hosted builds where there is nothing to mask.
#[derive(Debug, Copy, Clone)]
pub struct NoIrq;

impl IrqControl for NoIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
