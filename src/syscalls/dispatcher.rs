//! The bounded syscall table and its dispatcher.
//!
//! Failure is always the all-ones sentinel; there is no error-code taxonomy
//! at this layer. The table is populated once during boot and sealed behind
//! `spin::Once`, so the populate-once, read-forever discipline is enforced by
//! construction instead of convention.

use spin::Once;

use super::handlers;
use super::numbers::{SyscallNumber, SYSCALL_LIMIT};

/// Callbacks take six argument slots for ABI uniformity; the dispatcher only
/// ever forwards five and pins the sixth to zero.
pub type SyscallFn = fn(u64, u64, u64, u64, u64, u64) -> u64;

/// The reserved "no such syscall / bad arguments" result.
pub const SYSCALL_FAILURE: u64 = u64::MAX;

pub struct SyscallTable {
    entries: [Option<SyscallFn>; SYSCALL_LIMIT],
}

impl SyscallTable {
    pub const fn new() -> Self {
        Self {
            entries: [None; SYSCALL_LIMIT],
        }
    }

    pub fn set(&mut self, number: SyscallNumber, handler: SyscallFn) {
        self.entries[number.as_usize()] = Some(handler);
    }

    /// Bounds-checked lookup; out-of-range numbers are simply absent.
    pub fn get(&self, number: u64) -> Option<SyscallFn> {
        usize::try_from(number)
            .ok()
            .and_then(|index| self.entries.get(index))
            .copied()
            .flatten()
    }

    pub fn dispatch(&self, number: u64, a1: u64, a2: u64, a3: u64, a4: u64, a5: u64) -> u64 {
        match self.get(number) {
            Some(handler) => handler(a1, a2, a3, a4, a5, 0),
            None => SYSCALL_FAILURE,
        }
    }
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::new()
    }
}

static SYSCALL_TABLE: Once<SyscallTable> = Once::new();

/// The boot-time handler set. `sys_read` exists but is not wired in; the
/// published surface stops at write/exit for now.
pub(crate) fn builtin_table() -> SyscallTable {
    let mut table = SyscallTable::new();
    table.set(SyscallNumber::Write, handlers::io::sys_write);
    table.set(SyscallNumber::Exit, handlers::process::sys_exit);
    table
}

/// Publish the table. The first call wins; re-running is a no-op.
pub fn init_table() {
    SYSCALL_TABLE.call_once(builtin_table);
}

/// The syscall dispatcher: called by the fast-syscall trampoline with the
/// number and up to five arguments.
pub fn dispatch(number: u64, a1: u64, a2: u64, a3: u64, a4: u64, a5: u64) -> u64 {
    match SYSCALL_TABLE.get() {
        Some(table) => table.dispatch(number, a1, a2, a3, a4, a5),
        None => SYSCALL_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting_syscall(a1: u64, a2: u64, a3: u64, a4: u64, a5: u64, _a6: u64) -> u64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        a1 + a2 + a3 + a4 + a5
    }

    static SIXTH_ARG: AtomicU64 = AtomicU64::new(0xffff);

    fn sixth_arg_probe(_a1: u64, _a2: u64, _a3: u64, _a4: u64, _a5: u64, a6: u64) -> u64 {
        SIXTH_ARG.store(a6, Ordering::SeqCst);
        0
    }

    #[test]
    fn out_of_range_number_returns_sentinel() {
        let table = builtin_table();
        assert_eq!(table.dispatch(9999, 0, 0, 0, 0, 0), SYSCALL_FAILURE);
        assert_eq!(table.dispatch(u64::MAX, 0, 0, 0, 0, 0), SYSCALL_FAILURE);
    }

    #[test]
    fn absent_slot_returns_sentinel() {
        let table = SyscallTable::new();
        assert_eq!(table.dispatch(SyscallNumber::Write.as_u64(), 0, 0, 0, 0, 0), SYSCALL_FAILURE);
    }

    #[test]
    fn registered_handler_runs_exactly_once() {
        let mut table = SyscallTable::new();
        table.set(SyscallNumber::Read, counting_syscall);

        let result = table.dispatch(SyscallNumber::Read.as_u64(), 1, 2, 3, 4, 5);

        assert_eq!(result, 15);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sixth_argument_is_always_zero() {
        let mut table = SyscallTable::new();
        table.set(SyscallNumber::Exit, sixth_arg_probe);

        table.dispatch(SyscallNumber::Exit.as_u64(), 9, 9, 9, 9, 9);

        assert_eq!(SIXTH_ARG.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn builtin_table_wires_write_and_exit_but_not_read() {
        let table = builtin_table();
        assert!(table.get(SyscallNumber::Write.as_u64()).is_some());
        assert!(table.get(SyscallNumber::Exit.as_u64()).is_some());
        // implemented but deliberately left out of the table
        assert!(table.get(SyscallNumber::Read.as_u64()).is_none());
    }

    #[test]
    fn write_through_the_table_validates_the_fd() {
        let table = builtin_table();
        let data = *b"hello";
        let ptr = data.as_ptr() as u64;

        let write = SyscallNumber::Write.as_u64();
        assert_eq!(table.dispatch(write, 3, ptr, 5, 0, 0), SYSCALL_FAILURE);
        assert_eq!(table.dispatch(write, 1, 0, 5, 0, 0), SYSCALL_FAILURE);
        assert_eq!(table.dispatch(write, 1, ptr, 5, 0, 0), 5);
    }

    #[test]
    fn unpublished_global_table_fails_closed() {
        // dispatch before init_table: the sealed table does not exist yet
        assert_eq!(dispatch(SyscallNumber::Write.as_u64(), 0, 0, 0, 0, 0), SYSCALL_FAILURE);
    }
}
