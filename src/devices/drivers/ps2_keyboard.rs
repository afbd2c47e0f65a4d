//! # PS/2 Keyboard Driver
//!
//! IRQ1 reads one scancode from port 0x60 and pushes it into a lock-free
//! ring; consumers (the shell loop, the read syscall) drain the ring and run
//! the bytes through a set-1 decoder.
//!
//! Decoding handles the 0xE0 extended prefix (swallowed), key releases
//! (bit 7), and Shift/Ctrl/Alt tracking. Everything else maps through a flat
//! scancode-to-ASCII table.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use spin::Mutex;
use x86_64::instructions::port::Port;

use crate::interrupts::pic::{self, InterruptIndex};
use crate::trap::TrapFrame;

const QUEUE_SIZE: usize = 256;

/// Single-producer (IRQ1) single-consumer scancode queue. A full queue drops
/// the newest scancode rather than blocking the interrupt handler.
struct ScancodeQueue {
    buf: UnsafeCell<[u8; QUEUE_SIZE]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// Head and tail indices serialize all access to each slot.
unsafe impl Sync for ScancodeQueue {}

impl ScancodeQueue {
    const fn new() -> Self {
        Self {
            buf: UnsafeCell::new([0; QUEUE_SIZE]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    fn push(&self, scancode: u8) {
        let head = self.head.load(Ordering::Relaxed);
        let next = head.wrapping_add(1) % QUEUE_SIZE;
        if next == self.tail.load(Ordering::Acquire) {
            return;
        }
        unsafe {
            (*self.buf.get())[head] = scancode;
        }
        self.head.store(next, Ordering::Release);
    }

    fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let scancode = unsafe { (*self.buf.get())[tail] };
        self.tail.store(tail.wrapping_add(1) % QUEUE_SIZE, Ordering::Release);
        Some(scancode)
    }
}

static QUEUE: ScancodeQueue = ScancodeQueue::new();

pub fn enqueue_scancode(scancode: u8) {
    QUEUE.push(scancode);
}

pub fn dequeue_scancode() -> Option<u8> {
    QUEUE.pop()
}

/// Registered at vector 33.
pub fn keyboard_interrupt(_frame: &TrapFrame) {
    let mut port = Port::<u8>::new(0x60);
    let scancode = unsafe { port.read() };

    enqueue_scancode(scancode);

    pic::end_of_interrupt(InterruptIndex::Keyboard.as_u8());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub character: char,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

// Set-1 scancodes 0x00..0x3F; zero means "no printable mapping".
#[rustfmt::skip]
const KEYMAP_LOWER: &[u8; 0x40] =
    b"\0\x1b1234567890-=\x08\tqwertyuiop[]\n\0asdfghjkl;'`\0\\zxcvbnm,./\0*\0 \0\0\0\0\0\0";
#[rustfmt::skip]
const KEYMAP_UPPER: &[u8; 0x40] =
    b"\0\x1b!@#$%^&*()_+\x08\tQWERTYUIOP{}\n\0ASDFGHJKL:\"~\0|ZXCVBNM<>?\0*\0 \0\0\0\0\0\0";

pub struct ScancodeDecoder {
    is_extended: bool,
    shift_pressed: bool,
    ctrl_pressed: bool,
    alt_pressed: bool,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        Self {
            is_extended: false,
            shift_pressed: false,
            ctrl_pressed: false,
            alt_pressed: false,
        }
    }

    pub fn process_scancode(&mut self, scancode: u8) -> Option<KeyEvent> {
        if scancode == 0xE0 {
            self.is_extended = true;
            return None;
        }

        let is_release = scancode & 0x80 != 0;
        let key_code = scancode & 0x7F;

        // Extended keys (arrows, right ctrl, ...) have no character mapping
        // here; swallow the pair.
        if self.is_extended {
            self.is_extended = false;
            return None;
        }

        match key_code {
            0x2A | 0x36 => {
                self.shift_pressed = !is_release;
                return None;
            }
            0x1D => {
                self.ctrl_pressed = !is_release;
                return None;
            }
            0x38 => {
                self.alt_pressed = !is_release;
                return None;
            }
            _ => {}
        }

        if is_release {
            return None;
        }

        self.key_to_char(key_code).map(|character| KeyEvent {
            character,
            ctrl: self.ctrl_pressed,
            alt: self.alt_pressed,
            shift: self.shift_pressed,
        })
    }

    fn key_to_char(&self, key_code: u8) -> Option<char> {
        let map = if self.shift_pressed {
            KEYMAP_UPPER
        } else {
            KEYMAP_LOWER
        };
        match map.get(key_code as usize) {
            Some(&b) if b != 0 => Some(b as char),
            _ => None,
        }
    }
}

static READER_DECODER: Mutex<ScancodeDecoder> = Mutex::new(ScancodeDecoder::new());

/// Block until the keyboard produces a character. Backs the read syscall;
/// only meaningful once IRQ1 is unmasked.
pub fn read_char() -> char {
    loop {
        match dequeue_scancode() {
            Some(scancode) => {
                if let Some(event) = READER_DECODER.lock().process_scancode(scancode) {
                    return event.character;
                }
            }
            None => x86_64::instructions::hlt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_decodes_lowercase() {
        let mut decoder = ScancodeDecoder::new();
        let event = decoder.process_scancode(0x1E).unwrap();
        assert_eq!(event.character, 'a');
        assert!(!event.shift);
    }

    #[test]
    fn shift_maps_to_uppercase_and_symbols() {
        let mut decoder = ScancodeDecoder::new();
        assert!(decoder.process_scancode(0x2A).is_none()); // shift down
        assert_eq!(decoder.process_scancode(0x1E).unwrap().character, 'A');
        assert_eq!(decoder.process_scancode(0x02).unwrap().character, '!');
        assert!(decoder.process_scancode(0xAA).is_none()); // shift up
        assert_eq!(decoder.process_scancode(0x1E).unwrap().character, 'a');
    }

    #[test]
    fn releases_produce_no_events() {
        let mut decoder = ScancodeDecoder::new();
        decoder.process_scancode(0x1E);
        assert!(decoder.process_scancode(0x9E).is_none());
    }

    #[test]
    fn enter_and_backspace_map_to_control_chars() {
        let mut decoder = ScancodeDecoder::new();
        assert_eq!(decoder.process_scancode(0x1C).unwrap().character, '\n');
        assert_eq!(decoder.process_scancode(0x0E).unwrap().character, '\x08');
    }

    #[test]
    fn ctrl_flag_rides_along() {
        let mut decoder = ScancodeDecoder::new();
        decoder.process_scancode(0x1D); // ctrl down
        let event = decoder.process_scancode(0x2E).unwrap();
        assert_eq!(event.character, 'c');
        assert!(event.ctrl);
    }

    #[test]
    fn extended_prefix_is_swallowed() {
        let mut decoder = ScancodeDecoder::new();
        assert!(decoder.process_scancode(0xE0).is_none());
        assert!(decoder.process_scancode(0x48).is_none()); // arrow up
        // decoder state recovers for the next plain key
        assert_eq!(decoder.process_scancode(0x1E).unwrap().character, 'a');
    }

    #[test]
    fn queue_preserves_order() {
        enqueue_scancode(0x10);
        enqueue_scancode(0x11);
        assert_eq!(dequeue_scancode(), Some(0x10));
        assert_eq!(dequeue_scancode(), Some(0x11));
        assert_eq!(dequeue_scancode(), None);
    }
}
