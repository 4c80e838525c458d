//! A concrete [`Decompressor`] backed by `miniz_oxide`'s streaming inflate.
//!
//! `flate2` (the teacher crate's own decompression dependency) links std
//! unconditionally and has no place on a bare-metal target; `miniz_oxide` is
//! the `no_std + alloc`-free engine flate2 itself wraps on non-system-zlib
//! builds, so it is the natural substitute here. Gated behind the `miniz`
//! feature — the trait in [`crate::inflate`] is the real seam, this is just
//! one real implementation of it for tests and for targets that don't ship
//! their own.

use miniz_oxide::inflate::stream::{inflate, InflateState};
use miniz_oxide::{DataFormat, MZFlush, MZStatus};

use crate::inflate::{Decompressor, InflateError, InflateFlags, InflateStatus};

pub struct MinizDecompressor {
    state: InflateState,
}

impl MinizDecompressor {
    pub fn new() -> Self {
        Self {
            state: InflateState::new(DataFormat::Zlib),
        }
    }
}

impl Default for MinizDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for MinizDecompressor {
    fn reset(&mut self) {
        self.state = InflateState::new(DataFormat::Zlib);
    }

    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flags: InflateFlags,
    ) -> Result<(InflateStatus, usize, usize), InflateError> {
        let flush = if flags.contains(InflateFlags::HAS_MORE_INPUT) {
            MZFlush::None
        } else {
            MZFlush::Finish
        };

        let result = inflate(&mut self.state, input, output, flush);
        let consumed = result.bytes_consumed;
        let produced = result.bytes_written;

        match result.status {
            Ok(MZStatus::Ok) => {
                if produced == output.len() {
                    Ok((InflateStatus::HasMoreOutput, consumed, produced))
                } else {
                    Ok((InflateStatus::NeedsMoreInput, consumed, produced))
                }
            }
            Ok(MZStatus::StreamEnd) => Ok((InflateStatus::Done, consumed, produced)),
            Ok(MZStatus::NeedDict) | Err(_) => Err(InflateError),
        }
    }
}
