//! The system-call surface: fast-syscall entry configuration, the bounded
//! handler table, and the built-in handlers.

pub mod dispatcher;
pub mod entry;
pub mod handlers;
pub mod numbers;

pub use dispatcher::{dispatch, SyscallFn, SyscallTable, SYSCALL_FAILURE};

/// Configure the fast-syscall machine registers, then publish the syscall
/// table. Both must happen before interrupts are enabled or any user code
/// could run.
pub fn init() -> Result<(), &'static str> {
    entry::init()?;
    dispatcher::init_table();
    Ok(())
}
