/// Machine state captured by the vector stubs before dispatch.
///
/// The field order is the stack layout the common trap stub leaves behind:
/// fifteen pushed general-purpose registers, the vector and error code pushed
/// by the per-vector stub (a dummy zero where the CPU supplies none), and the
/// interrupt frame the CPU pushed itself. The frame lives on the trap stack
/// and dies when the stub returns; handlers must not keep references to it.
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct TrapFrame {
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub rbp: u64,
    pub rdi: u64,
    pub rsi: u64,
    pub rdx: u64,
    pub rcx: u64,
    pub rbx: u64,
    pub rax: u64,
    /// Which gate fired, 0..=255.
    pub vector: u64,
    /// Hardware error code for the vectors that push one, zero otherwise.
    pub error_code: u64,
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}
