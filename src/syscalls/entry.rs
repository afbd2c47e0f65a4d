//! Fast-syscall entry configuration.
//!
//! Three model-specific registers let the `syscall` instruction jump straight
//! into the kernel without touching the gate table: STAR holds the segment
//! selector pair, LSTAR the trampoline address, SFMASK the flag bits to clear
//! on entry. The trampoline in `entry.s` saves the return context, reshuffles
//! the argument registers into the SysV order and calls the dispatcher.
//!
//! Running this on a processor without syscall support is a boot-time
//! precondition violation, not a recoverable error.

use x86_64::registers::model_specific::{Efer, EferFlags, LStar, SFMask, Star};
use x86_64::registers::rflags::RFlags;
use x86_64::VirtAddr;

use crate::interrupts::gdt;
use crate::syscalls::numbers::SyscallNumber;

core::arch::global_asm!(include_str!("entry.s"));

extern "C" {
    fn syscall_entry();
}

/// Write EFER.SCE, STAR, LSTAR and SFMASK. Intended to run exactly once at
/// boot; re-running rewrites the same values.
pub fn init() -> Result<(), &'static str> {
    unsafe {
        Efer::update(|flags| flags.insert(EferFlags::SYSTEM_CALL_EXTENSIONS));
    }

    let selectors = gdt::selectors();
    Star::write(
        selectors.user_code,
        selectors.user_data,
        selectors.kernel_code,
        selectors.kernel_data,
    )
    .map_err(|_| "STAR rejected the GDT selector layout")?;

    LStar::write(VirtAddr::new(syscall_entry as usize as u64));

    // Interrupts stay off from the syscall instruction until the trampoline
    // owns a safe stack; nothing may preempt that window.
    SFMask::write(RFlags::INTERRUPT_FLAG);

    Ok(())
}

/// Rust landing point for the trampoline.
#[no_mangle]
extern "C" fn syscall_dispatch_entry(
    number: u64,
    a1: u64,
    a2: u64,
    a3: u64,
    a4: u64,
    a5: u64,
) -> u64 {
    super::dispatcher::dispatch(number, a1, a2, a3, a4, a5)
}

/// Issue `exit` through the real `syscall` instruction, driving the whole
/// MSR-configured entry path instead of calling the dispatcher directly.
pub fn exit_via_syscall(code: u64) -> ! {
    unsafe {
        core::arch::asm!(
            "syscall",
            in("rax") SyscallNumber::Exit.as_u64(),
            in("rdi") code,
            options(noreturn),
        );
    }
}
