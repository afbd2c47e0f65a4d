//! Unified trap dispatch.
//!
//! Every one of the 256 vectors funnels through the assembly stubs into
//! [`dispatch`], which consults the handler table and applies the three-way
//! policy:
//!
//! 1. a registered handler runs and the interrupted context resumes;
//! 2. an unregistered hardware interrupt (vector >= 32) is reported on both
//!    sinks and execution resumes — a stray timer tick must be visible but
//!    must not kill the machine;
//! 3. an unregistered CPU exception (vector < 32) is a kernel bug with no
//!    safe continuation and ends at the panic path.

pub mod exceptions;
pub mod frame;
pub mod page_fault;
pub mod panic;

pub use frame::TrapFrame;
pub use panic::{halt, kernel_panic};

use spin::RwLock;

use crate::interrupts::idt;
use crate::{println, serial_println};

use exceptions::{exception_name, EXCEPTION_COUNT};

pub const VECTOR_COUNT: usize = 256;

/// Handlers take the frame by reference and return to resume the interrupted
/// context; a handler that must not resume simply never returns.
pub type TrapHandler = fn(&TrapFrame);

pub struct HandlerTable {
    slots: [Option<TrapHandler>; VECTOR_COUNT],
}

impl HandlerTable {
    pub const fn new() -> Self {
        Self {
            slots: [None; VECTOR_COUNT],
        }
    }

    /// Install a handler. Re-registering a vector silently replaces the old
    /// handler; there is no removal.
    pub fn set(&mut self, vector: u8, handler: TrapHandler) {
        self.slots[vector as usize] = Some(handler);
    }

    pub fn get(&self, vector: u8) -> Option<TrapHandler> {
        self.slots[vector as usize]
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}

static HANDLERS: RwLock<HandlerTable> = RwLock::new(HandlerTable::new());

/// Install `handler` for `vector` and enable its hardware gate as one logical
/// action. The `u8` parameter makes out-of-range vectors unrepresentable.
///
/// Registration belongs in boot code, before interrupts are enabled: a trap
/// arriving while the write lock is held would spin in `dispatch` forever.
pub fn register(vector: u8, handler: TrapHandler) {
    HANDLERS.write().set(vector, handler);
    idt::enable_gate(vector);
}

/// Entry point for the assembly trampoline.
#[no_mangle]
extern "C" fn trap_dispatch(frame: *mut TrapFrame) {
    let frame = unsafe { &*frame };
    dispatch(frame);
}

pub fn dispatch(frame: &TrapFrame) {
    let vector = (frame.vector & 0xff) as u8;

    // Copy the handler out so no lock is held while it runs.
    let handler = HANDLERS.read().get(vector);

    if let Some(handler) = handler {
        handler(frame);
    } else if vector as usize >= EXCEPTION_COUNT {
        println!("Unhandled interrupt {}!", vector);
        serial_println!("Unhandled interrupt {}!", vector);
        panic::dump_machine_state(frame);
        // Non-fatal on purpose: nobody owns this IRQ yet, so there is also
        // nobody to acknowledge it. Report it and resume.
    } else {
        println!("Unhandled exception {}: {}", vector, exception_name(vector));
        serial_println!("Unhandled exception {}: {}", vector, exception_name(vector));
        kernel_panic(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    fn frame_with_vector(vector: u8) -> TrapFrame {
        TrapFrame {
            vector: vector as u64,
            ..TrapFrame::default()
        }
    }

    static FIRST_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SECOND_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SEEN_VECTOR: AtomicU64 = AtomicU64::new(0);

    fn first_handler(frame: &TrapFrame) {
        FIRST_CALLS.fetch_add(1, Ordering::SeqCst);
        SEEN_VECTOR.store(frame.vector, Ordering::SeqCst);
    }

    fn second_handler(_frame: &TrapFrame) {
        SECOND_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    static MASKED_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn masked_handler(_frame: &TrapFrame) {
        MASKED_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    static REPLACED_CALLS: AtomicUsize = AtomicUsize::new(0);
    static REPLACEMENT_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn replaced_handler(_frame: &TrapFrame) {
        REPLACED_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn replacement_handler(_frame: &TrapFrame) {
        REPLACEMENT_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn registered_handler_receives_the_frame() {
        register(77, first_handler);
        dispatch(&frame_with_vector(77));
        assert_eq!(FIRST_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(SEEN_VECTOR.load(Ordering::SeqCst), 77);
    }

    #[test]
    fn unhandled_interrupt_is_not_fatal() {
        // vector 100 has no handler; dispatch must simply return
        dispatch(&frame_with_vector(100));
    }

    #[test]
    fn reregistration_replaces_the_handler() {
        register(78, replaced_handler);
        register(78, replacement_handler);

        dispatch(&frame_with_vector(78));

        assert_eq!(REPLACED_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(REPLACEMENT_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_vector_has_its_own_slot() {
        let mut table = HandlerTable::new();
        for vector in 0..=255u8 {
            assert!(table.get(vector).is_none());
            table.set(vector, first_handler);
        }
        for vector in 0..=255u8 {
            assert_eq!(table.get(vector), Some(first_handler as TrapHandler));
        }
    }

    #[test]
    fn page_fault_slot_follows_last_write_wins() {
        let mut table = HandlerTable::new();
        table.set(exceptions::PAGE_FAULT, first_handler);
        table.set(exceptions::PAGE_FAULT, second_handler);
        assert_eq!(
            table.get(exceptions::PAGE_FAULT),
            Some(second_handler as TrapHandler)
        );
    }

    #[test]
    fn dispatch_masks_spurious_high_bits() {
        // the stubs push the vector as an immediate; the dispatcher only
        // trusts the low byte
        register(79, masked_handler);
        let frame = TrapFrame {
            vector: 0xffff_ff00 | 79,
            ..TrapFrame::default()
        };
        dispatch(&frame);
        assert_eq!(MASKED_CALLS.load(Ordering::SeqCst), 1);
    }
}
