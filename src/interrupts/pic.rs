//! Legacy 8259 PIC remapping.
//!
//! IRQ 0-15 collide with the CPU exception vectors by default, so the chips
//! are remapped: primary PIC to vectors 32-39, secondary to 40-47. Only the
//! timer (IRQ0) and keyboard (IRQ1) lines are unmasked; their handlers own
//! the end-of-interrupt notification.

use pic8259::ChainedPics;
use spin::Mutex;

pub const PIC_1_OFFSET: u8 = 32;
pub const PIC_2_OFFSET: u8 = 40;

pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

// Vector numbers as the CPU sees them after remapping
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,        // IRQ0
    Keyboard = PIC_1_OFFSET + 1, // IRQ1
}

impl InterruptIndex {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

pub fn init() {
    unsafe {
        let mut pics = PICS.lock();
        pics.initialize();
        // unmask timer and keyboard, leave everything else off
        pics.write_masks(0b1111_1100, 0b1111_1111);
    }
}

pub fn end_of_interrupt(vector: u8) {
    unsafe {
        PICS.lock().notify_end_of_interrupt(vector);
    }
}
