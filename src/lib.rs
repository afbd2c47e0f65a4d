//! Onyx kernel library.
//!
//! Everything lives here so the subsystems can be unit tested on the host;
//! `main.rs` is only the bare-metal entry point. The heart of the kernel is
//! the control-transfer core: the trap dispatch table (`trap`), the gate
//! layer feeding it (`interrupts`), and the fast-syscall surface
//! (`syscalls`).
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod cmd_executor;
pub mod devices;
pub mod framebuffer;
pub mod interrupts;
pub mod kernel;
pub mod memory;
pub mod serial;
pub mod syscalls;
pub mod terminal;
pub mod trap;
