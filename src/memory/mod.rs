//! Kernel heap: a fixed 1 MiB static region handed to a locked bump
//! allocator. Enough for the console grid and the shell; there is no paging
//! or frame allocation behind it.

pub mod allocators;

use allocators::LockedBumpAllocator;

pub const HEAP_SIZE: usize = 1024 * 1024;

static mut HEAP: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

#[cfg_attr(not(test), global_allocator)]
static ALLOCATOR: LockedBumpAllocator = LockedBumpAllocator::empty();

#[derive(Debug, Clone, Copy)]
pub struct HeapStats {
    pub total: usize,
    pub used: usize,
    pub allocations: usize,
}

pub fn init_heap() -> Result<(), &'static str> {
    unsafe {
        let start = core::ptr::addr_of_mut!(HEAP) as usize;
        ALLOCATOR.init(start, HEAP_SIZE);
    }
    Ok(())
}

pub fn heap_stats() -> HeapStats {
    ALLOCATOR.stats()
}
