//! Self-synchronizing SLIP-family framing: the byte-oriented codec at the
//! bottom of the stack.
//!
//! Encoding is a thin, symmetric wrapper around any [`embedded_io::Write`],
//! mirroring the shape of the host-tool's own SLIP encoder. Decoding is the
//! non-blocking, interrupt-safe half: a three-state machine that reassembles
//! bytes into whichever slot of a [`Ring`] is currently receiving, and
//! publishes a completed or errored slot for the foreground to pick up.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use embedded_io::Write;

use crate::frame::{END, ESC, ESC_END, ESC_ESC};
use crate::ring::{Ring, SlotState};

/// Encodes and writes one SLIP frame to `writer`, then flushes it.
///
/// `writer` is expected to be a thin adapter over the transport's TX FIFO
/// (see the `transport` module); a single [`Write::flush`] call after the
/// closing `END` stands in for the optional flush hook named in the framing
/// contract.
pub fn send_frame<W: Write>(writer: &mut W, data: &[u8]) -> Result<(), W::Error> {
    writer.write_all(&[END])?;
    for &byte in data {
        match byte {
            END => writer.write_all(&[ESC, ESC_END])?,
            ESC => writer.write_all(&[ESC, ESC_ESC])?,
            other => writer.write_all(&[other])?,
        }
    }
    writer.write_all(&[END])?;
    writer.flush()
}

/// The three states of the decode side of the wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum DecodeState {
    NoFrame = 0,
    InFrame = 1,
    Escaping = 2,
}

impl DecodeState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => DecodeState::InFrame,
            2 => DecodeState::Escaping,
            _ => DecodeState::NoFrame,
        }
    }
}

/// The overall state the foreground observes when polling the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Complete,
    Error,
}

/// The decode half of the framing codec: owns the receive [`Ring`] and the
/// small amount of state needed to keep reassembling a frame across a
/// buffer switch.
pub struct Decoder<const N: usize> {
    ring: Ring<N>,
    state: AtomicU8,
    receiving: AtomicUsize,
    processing: AtomicUsize,
}

impl<const N: usize> Decoder<N> {
    pub const fn new() -> Self {
        Self {
            ring: Ring::new(),
            state: AtomicU8::new(DecodeState::NoFrame as u8),
            receiving: AtomicUsize::new(0),
            processing: AtomicUsize::new(usize::MAX),
        }
    }

    fn decode_state(&self) -> DecodeState {
        DecodeState::from_raw(self.state.load(Ordering::Relaxed))
    }

    fn set_decode_state(&self, s: DecodeState) {
        self.state.store(s as u8, Ordering::Relaxed);
    }

    /// If the current receiving slot is no longer idle, pick a fresh one.
    /// Returns `false` if no idle slot exists — the caller should drop the
    /// byte (the host is expected to retry via higher-level flow control).
    fn ensure_receiving_slot(&self) -> bool {
        let idx = self.receiving.load(Ordering::Relaxed);
        if self.ring.state_of(idx) == SlotState::Idle {
            return true;
        }
        match self.ring.find_idle() {
            Some(fresh) => {
                self.receiving.store(fresh, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Ingests one byte. Non-blocking, safe to call from interrupt context;
    /// this is the sole producer-side entry point into the codec.
    pub fn recv_byte(&self, byte: u8) {
        if !self.ensure_receiving_slot() {
            return;
        }
        let idx = self.receiving.load(Ordering::Relaxed);

        match self.decode_state() {
            DecodeState::NoFrame => {
                if byte == END {
                    self.ring.clear_len(idx);
                    self.set_decode_state(DecodeState::InFrame);
                }
                // Any other byte outside a frame is dropped.
            }
            DecodeState::InFrame => match byte {
                END => {
                    if self.ring.len_of(idx) == 0 {
                        // Back-to-back END: stay at the start of a frame.
                        return;
                    }
                    self.ring.mark_complete(idx);
                    self.set_decode_state(DecodeState::NoFrame);
                }
                ESC => self.set_decode_state(DecodeState::Escaping),
                other => {
                    if !self.ring.push_byte(idx, other) {
                        self.ring.mark_error(idx);
                        self.set_decode_state(DecodeState::NoFrame);
                    }
                }
            },
            DecodeState::Escaping => {
                let ok = match byte {
                    ESC_END => self.ring.push_byte(idx, END),
                    ESC_ESC => self.ring.push_byte(idx, ESC),
                    _ => false,
                };
                if !ok {
                    self.ring.mark_error(idx);
                }
                self.set_decode_state(DecodeState::InFrame);
            }
        }
    }

    /// Selects a processing slot (error dominates complete) and reports its
    /// state. Has the side effect of remembering the selection for
    /// [`Self::frame_data`] and [`Self::recv_reset`].
    pub fn frame_state(&self) -> FrameState {
        match self.ring.find_processable() {
            Some((idx, SlotState::Error)) => {
                self.processing.store(idx, Ordering::Relaxed);
                FrameState::Error
            }
            Some((idx, SlotState::Complete)) => {
                self.processing.store(idx, Ordering::Relaxed);
                FrameState::Complete
            }
            _ => FrameState::Idle,
        }
    }

    /// The bytes of the currently selected processing buffer.
    ///
    /// Only meaningful immediately after [`Self::frame_state`] returned
    /// `Complete`; do not retain the slice across [`Self::recv_reset`].
    pub fn frame_data(&self) -> &[u8] {
        let idx = self.processing.load(Ordering::Relaxed);
        self.ring.data(idx)
    }

    /// Releases the processing buffer back to the idle pool.
    pub fn recv_reset(&self) {
        let idx = self.processing.load(Ordering::Relaxed);
        if idx != usize::MAX {
            self.ring.reset(idx);
        }
    }
}

impl<const N: usize> Default for Decoder<N> {
    fn default() -> Self {
        Self::new()
    }
}
