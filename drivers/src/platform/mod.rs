//! Platform Layer
//!
//! SoC-specific implementations of the HAL traits and the concrete host
//! interface UART type for each supported SoC.

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "nrc7292")] {
        pub mod nrc7292;
        pub use nrc7292 as current;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features nrc7292"
        );
    }
}
