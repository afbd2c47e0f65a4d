//! COM1 serial port, the secondary diagnostic sink.
//!
//! Everything the console prints about a failure is mirrored here so a dump
//! survives a broken framebuffer. Writes before `init` (or on the host) are
//! dropped.

use spin::Mutex;
use uart_16550::SerialPort;

const COM1: u16 = 0x3F8;

static SERIAL: Mutex<Option<SerialPort>> = Mutex::new(None);

pub fn init() {
    let mut port = unsafe { SerialPort::new(COM1) };
    port.init();
    *SERIAL.lock() = Some(port);
}

pub fn write_fmt(args: core::fmt::Arguments) {
    use core::fmt::Write;
    if let Some(port) = SERIAL.lock().as_mut() {
        let _ = port.write_fmt(args);
    }
}

/// Reclaim the port from whatever context held it when a fatal trap hit.
/// Only the panic path may call this; the previous holder never resumes.
pub unsafe fn force_unlock() {
    SERIAL.force_unlock();
}

#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::serial::write_fmt(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($fmt:expr) => ($crate::serial_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::serial_print!(concat!($fmt, "\n"), $($arg)*));
}
