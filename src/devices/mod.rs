//! Device Subsystem
//!
//! - `drivers`: PS/2 keyboard driver

pub mod drivers;
