use crate::sync::irq::IrqControl;

const PRIMASK_PM_BIT: u32 = 1 << 0;

pub struct ArmIrq;

/// Interrupt control for Cortex-M cores.
///
/// Masks configurable-priority exceptions through PRIMASK.
///
/// # State Management
/// The `State` type is `bool`: `true` when interrupts were enabled before
/// `disable()` was called.
///
/// # Assembly Details
///
/// - `mrs {0}, PRIMASK`: read the current mask
/// - `cpsid i`: set PRIMASK, masking interrupts
/// - `cpsie i`: clear PRIMASK, unmasking interrupts
///
/// Both sequences act as compiler barriers so that accesses inside a
/// critical section are not hoisted out of it.
impl IrqControl for ArmIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let primask: u32;
        unsafe {
            core::arch::asm!(
                "mrs {0}, PRIMASK",
                "cpsid i",
                out(reg) primask,
                options(nostack, preserves_flags)
            );
        }
        primask & PRIMASK_PM_BIT == 0
    }

    #[inline(always)]
    fn restore(prev_enabled: bool) {
        if prev_enabled {
            unsafe {
                core::arch::asm!("cpsie i", options(nostack, preserves_flags));
            }
        }
    }
}
