//! PIT tick counting, the time base behind the shell's `uptime`.

use core::sync::atomic::{AtomicU64, Ordering};

use x86_64::instructions::port::Port;

use crate::interrupts::pic::{self, InterruptIndex};
use crate::trap::TrapFrame;

pub const TICK_HZ: u64 = 100;
// PIT input clock is 1193182 Hz; this reload value gives ~100 Hz.
const PIT_DIVISOR: u16 = 11932;

const PIT_COMMAND: u16 = 0x43;
const PIT_CHANNEL_0: u16 = 0x40;

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Program PIT channel 0 as a 100 Hz rate generator.
pub fn init() {
    let mut command = Port::<u8>::new(PIT_COMMAND);
    let mut channel0 = Port::<u8>::new(PIT_CHANNEL_0);
    unsafe {
        command.write(0x36); // channel 0, lobyte/hibyte, square wave
        channel0.write(PIT_DIVISOR as u8);
        channel0.write((PIT_DIVISOR >> 8) as u8);
    }
}

pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

pub fn uptime_seconds() -> u64 {
    ticks() / TICK_HZ
}

/// Registered at vector 32.
pub fn timer_interrupt(_frame: &TrapFrame) {
    TICKS.fetch_add(1, Ordering::Relaxed);
    pic::end_of_interrupt(InterruptIndex::Timer.as_u8());
}
