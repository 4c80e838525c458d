//! The fixed multi-buffer receive ring shared between the RX interrupt
//! producer and the foreground consumer.
//!
//! Exactly one producer (the transport's byte-RX interrupt) and one
//! consumer (the foreground dispatch loop) touch this structure. Per-slot
//! state is published with `Release` and observed with `Acquire`, which is
//! sufficient on a single core with no other synchronization: the producer
//! writes a slot's body, then publishes by storing its `SlotState` last; the
//! consumer loads the state first and only then reads the body.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::frame::MAX_FRAME_SIZE;

/// Per-slot publication state. `Complete` and `Error` are mutually
/// exclusive by construction (invariant 4 of the data model): a slot is in
/// exactly one of these three states at any observable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SlotState {
    Idle = 0,
    Complete = 1,
    Error = 2,
}

impl SlotState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => SlotState::Complete,
            2 => SlotState::Error,
            _ => SlotState::Idle,
        }
    }
}

struct Slot {
    // Only ever read/written by whichever side currently owns the slot, as
    // determined by `state`; never accessed concurrently by both sides.
    buffer: UnsafeCell<[u8; MAX_FRAME_SIZE]>,
    len: AtomicUsize,
    state: AtomicU8,
}

// SAFETY: access to `buffer` is serialized by the `state` flag's
// acquire/release discipline documented above; only one side ever holds a
// live reference to a given slot's bytes at a time.
unsafe impl Sync for Slot {}

impl Slot {
    const fn new() -> Self {
        Self {
            buffer: UnsafeCell::new([0u8; MAX_FRAME_SIZE]),
            len: AtomicUsize::new(0),
            state: AtomicU8::new(SlotState::Idle as u8),
        }
    }

    fn state(&self) -> SlotState {
        SlotState::from_raw(self.state.load(Ordering::Acquire))
    }
}

/// A fixed pool of `N` receive buffers (`N >= 2`, enforced by the caller
/// picking a sane const generic — the codec never validates this itself).
pub struct Ring<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> Ring<N> {
    /// Creates an all-idle ring. Suitable for a `static` initializer.
    pub const fn new() -> Self {
        // Work around `[Slot; N]: Copy` not being available for const init.
        const SLOT: Slot = Slot::new();
        Self { slots: [SLOT; N] }
    }

    pub fn state_of(&self, idx: usize) -> SlotState {
        self.slots[idx].state()
    }

    pub fn len_of(&self, idx: usize) -> usize {
        self.slots[idx].len.load(Ordering::Acquire)
    }

    /// Appends one byte to `idx`'s buffer. Returns `false` on overflow,
    /// leaving the slot's length unchanged (the caller marks the slot in
    /// error).
    pub fn push_byte(&self, idx: usize, byte: u8) -> bool {
        let len = self.slots[idx].len.load(Ordering::Relaxed);
        if len >= MAX_FRAME_SIZE {
            return false;
        }
        // SAFETY: only the producer calls this, and only while the slot is
        // `Idle` (i.e. not yet published to the consumer).
        unsafe {
            (*self.slots[idx].buffer.get())[len] = byte;
        }
        self.slots[idx].len.store(len + 1, Ordering::Relaxed);
        true
    }

    pub fn clear_len(&self, idx: usize) {
        self.slots[idx].len.store(0, Ordering::Relaxed);
    }

    pub fn mark_complete(&self, idx: usize) {
        self.slots[idx].state.store(SlotState::Complete as u8, Ordering::Release);
    }

    pub fn mark_error(&self, idx: usize) {
        self.slots[idx].state.store(SlotState::Error as u8, Ordering::Release);
    }

    /// Releases `idx` back to the producer pool.
    pub fn reset(&self, idx: usize) {
        self.slots[idx].len.store(0, Ordering::Relaxed);
        self.slots[idx].state.store(SlotState::Idle as u8, Ordering::Release);
    }

    /// Borrows the completed data in `idx`.
    ///
    /// # Safety
    /// Caller must only call this while `state_of(idx) == Complete` and must
    /// not retain the slice across a subsequent `reset(idx)`.
    pub fn data(&self, idx: usize) -> &[u8] {
        let len = self.len_of(idx);
        // SAFETY: the consumer is the sole reader once a slot has been
        // published `Complete`; the producer never touches it again until
        // `reset` returns it to `Idle`.
        unsafe { &(*self.slots[idx].buffer.get())[..len] }
    }

    /// Scans for any slot that is neither `Complete` nor `Error`.
    pub fn find_idle(&self) -> Option<usize> {
        (0..N).find(|&i| self.slots[i].state() == SlotState::Idle)
    }

    /// Scans for a slot the foreground should process: `Error` dominates
    /// over `Complete`, which dominates over reporting nothing.
    pub fn find_processable(&self) -> Option<(usize, SlotState)> {
        if let Some(i) = (0..N).find(|&i| self.slots[i].state() == SlotState::Error) {
            return Some((i, SlotState::Error));
        }
        (0..N)
            .find(|&i| self.slots[i].state() == SlotState::Complete)
            .map(|i| (i, SlotState::Complete))
    }
}

impl<const N: usize> Default for Ring<N> {
    fn default() -> Self {
        Self::new()
    }
}
