//! Page-fault diagnostics. There is no demand paging and no copy-on-write,
//! so every page fault is a kernel bug and ends at the panic path.

use x86_64::structures::idt::PageFaultErrorCode;

use crate::framebuffer::Color;
use crate::{printcol, println, serial_println};

use super::panic::{dump_machine_state, fault_context, halt, reclaim_sinks};
use super::TrapFrame;

/// Whether the faulting access was a read or a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultAccess {
    Read,
    Write,
}

impl FaultAccess {
    /// Decided by the write bit of the architectural error code. The present
    /// bit says nothing about the access direction.
    pub fn from_error_code(error_code: u64) -> Self {
        let code = PageFaultErrorCode::from_bits_truncate(error_code);
        if code.contains(PageFaultErrorCode::CAUSED_BY_WRITE) {
            FaultAccess::Write
        } else {
            FaultAccess::Read
        }
    }
}

/// Handler registered at vector 14 before interrupts are ever enabled.
///
/// CR2/CR3 are read here, at handler time, because they are not part of the
/// saved general-purpose state.
pub fn page_fault_handler(frame: &TrapFrame) {
    let (faulting_address, page_table_base) = fault_context();

    reclaim_sinks();

    printcol!(Color::RED, "KERNEL PANIC!\n");
    serial_println!("KERNEL PANIC!");
    printcol!(Color::LIGHT_RED, "PAGE FAULT TRIGGERED!\n");
    serial_println!("PAGE FAULT TRIGGERED!");
    println!("You are most likely trying to access an invalid or non-mapped memory address.");
    serial_println!("You are most likely trying to access an invalid or non-mapped memory address.");

    println!("Error code: {:#x}", frame.error_code);
    println!("  Faulting address (CR2): {:#x}", faulting_address);
    println!("  Page table base (CR3): {:#x}", page_table_base);
    serial_println!("Error code: {:#x}", frame.error_code);
    serial_println!("  Faulting address (CR2): {:#x}", faulting_address);
    serial_println!("  Page table base (CR3): {:#x}", page_table_base);

    dump_machine_state(frame);

    match FaultAccess::from_error_code(frame.error_code) {
        FaultAccess::Read => {
            println!("Page fault caused by invalid read operation.");
            serial_println!("Page fault caused by invalid read operation.");
        }
        FaultAccess::Write => {
            println!("Page fault caused by invalid write operation.");
            serial_println!("Page fault caused by invalid write operation.");
        }
    }

    halt();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_zero_is_a_read() {
        assert_eq!(FaultAccess::from_error_code(0x0), FaultAccess::Read);
    }

    #[test]
    fn write_bit_set_is_a_write() {
        assert_eq!(FaultAccess::from_error_code(0x2), FaultAccess::Write);
    }

    #[test]
    fn present_bit_does_not_decide_direction() {
        // present fault on a read access
        assert_eq!(FaultAccess::from_error_code(0x1), FaultAccess::Read);
        // present fault on a user-mode write access
        assert_eq!(FaultAccess::from_error_code(0x7), FaultAccess::Write);
    }
}
