//! The streaming-decompressor seam consumed by the `FLASH_DEFL_*` pipeline.
//!
//! The actual inflate algorithm is an opaque external capability per the
//! system scope; this module only fixes the interface shape the pipeline
//! drives it through. A concrete adapter onto `miniz_oxide` is provided
//! behind the `miniz` feature (see [`crate::inflate_miniz`]) so the
//! streaming-write tests in `handlers::flash_defl` have something real to
//! run against.

use bitflags::bitflags;

bitflags! {
    /// Flags passed to every [`Decompressor::decompress`] call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InflateFlags: u8 {
        /// The stream begins with a zlib header to be parsed and validated.
        const PARSE_ZLIB_HEADER = 0b01;
        /// More compressed input remains after this call's `input` slice;
        /// clear this on the call that supplies the final bytes of the
        /// compressed stream.
        const HAS_MORE_INPUT = 0b10;
    }
}

/// Outcome of one [`Decompressor::decompress`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateStatus {
    /// The output buffer is full; drain it and call again with the same
    /// remaining input.
    HasMoreOutput,
    /// All of `input` was consumed but the stream isn't finished; supply
    /// more input.
    NeedsMoreInput,
    /// The stream completed successfully.
    Done,
}

/// A stream-level inflate failure (corrupt zlib header, bad deflate data,
/// ...). The specific cause is opaque; the dispatcher only needs to know
/// that it happened in order to report `INFLATE_ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateError;

/// A streaming zlib/deflate decompressor.
///
/// Implementations own their own working state (the LZ77 window, bit
/// buffer, etc.); `decompress` is called repeatedly as compressed input
/// arrives, draining `output` to flash between calls as it fills.
pub trait Decompressor {
    /// Resets internal state to start a fresh stream, used when the host
    /// restarts a `FLASH_DEFL_DATA` stream at `seq == 0`.
    fn reset(&mut self);

    /// Feeds `input` into the decompressor, writing as much inflated output
    /// as fits into `output`.
    ///
    /// Returns `(status, consumed, produced)`: how much of `input` was
    /// consumed and how much of `output` was filled.
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flags: InflateFlags,
    ) -> Result<(InflateStatus, usize, usize), InflateError>;
}
