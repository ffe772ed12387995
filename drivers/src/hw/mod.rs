//! Raw register layouts.

pub mod hsuart;
