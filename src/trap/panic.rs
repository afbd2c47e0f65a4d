//! The terminal diagnostic path: dump everything, then stop the machine.
//!
//! Nothing here allocates, and the sink locks are forcibly reclaimed before
//! the first write, so this path stays usable when the trap machinery itself
//! is what broke (including from contexts that already held a sink lock).

use crate::framebuffer::Color;
use crate::{printcol, serial, serial_println, terminal};

use super::TrapFrame;

/// Render the panic banner and the full machine state to both sinks, then
/// halt forever. Never returns control to the caller.
pub fn kernel_panic(frame: &TrapFrame) -> ! {
    reclaim_sinks();

    printcol!(Color::RED, "KERNEL PANIC!\n");
    serial_println!("KERNEL PANIC!");
    dump_machine_state(frame);

    halt();
}

/// Park the processor in a low-power wait loop with interrupts off.
pub fn halt() -> ! {
    x86_64::instructions::interrupts::disable();
    loop {
        x86_64::instructions::hlt();
    }
}

/// Write the saved registers plus the fault-context control registers to the
/// console and the serial port.
pub fn dump_machine_state(frame: &TrapFrame) {
    let (cr2, cr3) = fault_context();

    emit(format_args!(
        "  rax={:#018x}  rbx={:#018x}  rcx={:#018x}\n",
        frame.rax, frame.rbx, frame.rcx
    ));
    emit(format_args!(
        "  rdx={:#018x}  rsi={:#018x}  rdi={:#018x}\n",
        frame.rdx, frame.rsi, frame.rdi
    ));
    emit(format_args!(
        "  r8 ={:#018x}  r9 ={:#018x}  r10={:#018x}\n",
        frame.r8, frame.r9, frame.r10
    ));
    emit(format_args!(
        "  r11={:#018x}  r12={:#018x}  r13={:#018x}\n",
        frame.r11, frame.r12, frame.r13
    ));
    emit(format_args!(
        "  r14={:#018x}  r15={:#018x}  rbp={:#018x}\n",
        frame.r14, frame.r15, frame.rbp
    ));
    emit(format_args!(
        "  rsp={:#018x}  rip={:#018x}  rflags={:#018x}\n",
        frame.rsp, frame.rip, frame.rflags
    ));
    emit(format_args!(
        "  cs={:#06x}  ss={:#06x}  cr2={:#018x}  cr3={:#018x}\n",
        frame.cs, frame.ss, cr2, cr3
    ));
    emit(format_args!(
        "  vector={:#x}  errorcode={:#x}\n",
        frame.vector, frame.error_code
    ));
}

fn emit(args: core::fmt::Arguments) {
    terminal::write_fmt(args);
    serial::write_fmt(args);
}

/// Take both sink locks away from whoever held them. Sound only because the
/// callers never return to the interrupted context.
pub(crate) fn reclaim_sinks() {
    unsafe {
        terminal::force_unlock();
        serial::force_unlock();
    }
}

/// CR2 (faulting address) and CR3 (page-table base), read fresh each time.
#[cfg(not(test))]
pub(crate) fn fault_context() -> (u64, u64) {
    use x86_64::registers::control::{Cr2, Cr3};

    // CR2 can hold a non-canonical value; dump zero rather than refusing
    let cr2 = match Cr2::read() {
        Ok(addr) => addr.as_u64(),
        Err(_) => 0,
    };
    let cr3 = Cr3::read().0.start_address().as_u64();
    (cr2, cr3)
}

// Control registers are privileged; host tests dump zeros instead.
#[cfg(test)]
pub(crate) fn fault_context() -> (u64, u64) {
    (0, 0)
}
