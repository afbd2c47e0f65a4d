//! I/O system calls.
//!
//! | FD | Stream | Backing            |
//! |----|--------|--------------------|
//! | 0  | stdin  | PS/2 keyboard      |
//! | 1  | stdout | console terminal   |
//! | 2  | stderr | console terminal   |
//!
//! Neither handler validates the buffer against any ownership model; there
//! is no process model yet, so pointers are trusted as-is.

use crate::devices::drivers::ps2_keyboard;
use crate::syscalls::dispatcher::SYSCALL_FAILURE;
use crate::terminal;

/// write(fd, buf, len): copy `len` bytes to the console. Both stdout and
/// stderr land on the same sink.
pub fn sys_write(fd: u64, buf: u64, len: u64, _a4: u64, _a5: u64, _a6: u64) -> u64 {
    if buf == 0 || (fd != 1 && fd != 2) {
        return SYSCALL_FAILURE;
    }

    let bytes = unsafe { core::slice::from_raw_parts(buf as *const u8, len as usize) };
    terminal::write_bytes(bytes);
    len
}

/// read(fd, buf, count): pull keyboard characters one at a time until a
/// newline (which is stored and counted) or until `count` bytes are read.
///
/// Implemented at the function level but not registered in the syscall
/// table; see the dispatcher's `builtin_table`.
pub fn sys_read(fd: u64, buf: u64, count: u64, _a4: u64, _a5: u64, _a6: u64) -> u64 {
    if buf == 0 {
        return SYSCALL_FAILURE;
    }
    if fd != 0 {
        return SYSCALL_FAILURE;
    }

    let bytes = unsafe { core::slice::from_raw_parts_mut(buf as *mut u8, count as usize) };
    for (i, slot) in bytes.iter_mut().enumerate() {
        let ch = ps2_keyboard::read_char();
        *slot = ch as u8;

        if ch == '\n' {
            return (i + 1) as u64; // the newline counts
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_accepts_stdout_and_stderr() {
        let data = *b"hi";
        let ptr = data.as_ptr() as u64;
        // no console is up on the host, so the bytes are dropped, but the
        // contract is the byte count
        assert_eq!(sys_write(1, ptr, 2, 0, 0, 0), 2);
        assert_eq!(sys_write(2, ptr, 2, 0, 0, 0), 2);
    }

    #[test]
    fn write_rejects_other_fds() {
        let data = *b"hello";
        let ptr = data.as_ptr() as u64;
        assert_eq!(sys_write(0, ptr, 5, 0, 0, 0), SYSCALL_FAILURE);
        assert_eq!(sys_write(3, ptr, 5, 0, 0, 0), SYSCALL_FAILURE);
    }

    #[test]
    fn write_rejects_null_buffer() {
        assert_eq!(sys_write(1, 0, 2, 0, 0, 0), SYSCALL_FAILURE);
    }

    #[test]
    fn write_of_zero_bytes_is_fine() {
        let data = *b"x";
        assert_eq!(sys_write(1, data.as_ptr() as u64, 0, 0, 0, 0), 0);
    }

    #[test]
    fn read_validates_before_blocking() {
        let mut buf = [0u8; 4];
        let ptr = buf.as_mut_ptr() as u64;
        assert_eq!(sys_read(0, 0, 4, 0, 0, 0), SYSCALL_FAILURE);
        assert_eq!(sys_read(1, ptr, 4, 0, 0, 0), SYSCALL_FAILURE);
        assert_eq!(sys_read(7, ptr, 4, 0, 0, 0), SYSCALL_FAILURE);
    }
}
