//! Device Drivers
//!
//! - PS/2 Keyboard (IRQ1)

pub mod ps2_keyboard;

pub use ps2_keyboard::{dequeue_scancode, enqueue_scancode, KeyEvent, ScancodeDecoder};
