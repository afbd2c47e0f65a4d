//! Kernel initialization phases

use crate::serial_println;
use crate::{interrupts, syscalls};

/// Bring the machine up in dependency order. Each phase reports its outcome
/// on the serial port; the console is not alive yet at this point.
pub fn init_kernel() -> Result<(), &'static str> {
    serial_println!("Onyx kernel initialization");

    init_phase("interrupt system", interrupts::init)?;
    init_phase("syscall interface", syscalls::init)?;

    // Only now is it safe to take hardware interrupts: the page-fault
    // handler and the syscall table are both in place.
    x86_64::instructions::interrupts::enable();

    serial_println!("kernel initialization complete");
    Ok(())
}

fn init_phase(
    name: &'static str,
    init_fn: fn() -> Result<(), &'static str>,
) -> Result<(), &'static str> {
    match init_fn() {
        Ok(()) => {
            serial_println!("  [ok] {}", name);
            Ok(())
        }
        Err(e) => {
            serial_println!("  [failed] {}: {}", name, e);
            Err(e)
        }
    }
}
