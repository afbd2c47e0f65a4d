//! Process system calls. With no process model yet, `exit` can only stop
//! the machine.

use crate::trap;

/// exit(code): the code has nowhere to go, so it is ignored and the
/// processor parks forever. Never returns to the caller.
pub fn sys_exit(_code: u64, _a2: u64, _a3: u64, _a4: u64, _a5: u64, _a6: u64) -> u64 {
    trap::halt();
}
