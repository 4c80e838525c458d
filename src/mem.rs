//! The narrow unsafe seam for raw address arithmetic: writing directly into
//! RAM at a host-supplied address, and jumping to a host-supplied entry
//! point. Every other module in this crate is safe code; this is the one
//! place the wire protocol's "write/jump to any address" contract forces
//! `unsafe`.

/// Copies `data` to the RAM address `dest`.
///
/// # Safety
/// `dest` must be a valid, writable address for `data.len()` bytes, and the
/// caller (the `MEM_DATA` handler) is trusting the host's `MEM_BEGIN`
/// offset unconditionally — there is no authentication on this wire, by
/// design (see the crate's non-goals).
pub unsafe fn write_to(dest: u32, data: &[u8]) {
    let ptr = dest as *mut u8;
    core::ptr::copy_nonoverlapping(data.as_ptr(), ptr, data.len());
}

/// Transfers control to `entrypoint` as a `fn()` and never returns.
///
/// # Safety
/// `entrypoint` must be the address of a valid `extern "C" fn()` with no
/// arguments and no return, per the `MEM_END` contract. Invariant 7 of the
/// data model: this never returns to the caller.
pub unsafe fn jump_to(entrypoint: u32) -> ! {
    let f: extern "C" fn() -> ! = core::mem::transmute(entrypoint as usize);
    f()
}
