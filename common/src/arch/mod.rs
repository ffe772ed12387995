//! Architecture selection for interrupt masking.

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        pub mod arm;
        pub use arm::irq::ArmIrq as CurrentIrq;
    } else {
        pub use crate::sync::irq::NoIrq as CurrentIrq;
    }
}
