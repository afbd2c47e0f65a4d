//! Interrupt hardware bring-up: segmentation, the gate table, the PIC, and
//! the baseline trap handlers.

pub mod gdt;
pub mod idt;
pub mod pic;
pub mod timer;

use crate::devices::drivers::ps2_keyboard;
use crate::trap::{self, exceptions, page_fault::page_fault_handler};

pub fn init() -> Result<(), &'static str> {
    gdt::init();
    idt::init();

    // The page-fault handler must be in place before interrupts ever fire.
    trap::register(exceptions::PAGE_FAULT, page_fault_handler);
    trap::register(pic::InterruptIndex::Timer.as_u8(), timer::timer_interrupt);
    trap::register(
        pic::InterruptIndex::Keyboard.as_u8(),
        ps2_keyboard::keyboard_interrupt,
    );

    // Everything else still routes to the dispatcher, which reports strays.
    idt::enable_all_gates();

    pic::init();
    timer::init();

    Ok(())
}
